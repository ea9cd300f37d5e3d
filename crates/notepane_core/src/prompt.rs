//! Modal question requests.
//!
//! The shell answers a `PromptKind` with `Some(text)` or `None` when the
//! user cancels; core never blocks waiting for it.

/// Question the shell should ask the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Gateway API key. Input is masked.
    ApiKey,
    /// New name for the open note, prefilled with the current one.
    RenameNote { current: String },
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            Self::ApiKey => "Please enter your Google Gemini API Key:".to_string(),
            Self::RenameNote { current } => format!("Rename '{current}' to:"),
        }
    }

    /// Text the input starts with.
    pub fn initial_value(&self) -> &str {
        match self {
            Self::ApiKey => "",
            Self::RenameNote { current } => current.as_str(),
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::ApiKey => "YOUR_API_KEY_HERE",
            Self::RenameNote { .. } => "new-name.txt",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Self::ApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::PromptKind;

    #[test]
    fn rename_prompt_is_prefilled_and_visible() {
        let kind = PromptKind::RenameNote {
            current: "a.txt".to_string(),
        };
        assert_eq!(kind.initial_value(), "a.txt");
        assert_eq!(kind.title(), "Rename 'a.txt' to:");
        assert!(!kind.is_secret());
        assert!(PromptKind::ApiKey.is_secret());
    }
}
