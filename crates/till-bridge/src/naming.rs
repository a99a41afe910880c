//! Legacy channel to native command name derivation

/// Characters rewritten to the command separator (whitespace is rewritten too)
pub const REPLACED_SEPARATORS: [char; 4] = [':', '-', '/', '.'];

/// Deterministic channel-to-command naming.
///
/// Every namespace or path separator becomes the configured separator, so
/// `settings:get`, `settings-get` and `settings/get` all land on
/// `settings_get`. Applying the derivation to its own output is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandNaming {
    separator: char,
}

impl Default for CommandNaming {
    fn default() -> Self {
        Self { separator: '_' }
    }
}

impl CommandNaming {
    /// Naming with a custom separator
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Separator written in place of each rewritten character
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Native command (or event) name for a legacy channel
    pub fn derive(&self, channel: &str) -> String {
        channel
            .chars()
            .map(|c| {
                if REPLACED_SEPARATORS.contains(&c) || c.is_whitespace() {
                    self.separator
                } else {
                    c
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_collapse_to_underscore() {
        let naming = CommandNaming::default();
        assert_eq!(naming.derive("settings:get"), "settings_get");
        assert_eq!(naming.derive("get-settings"), "get_settings");
        assert_eq!(naming.derive("printer/status.changed"), "printer_status_changed");
        assert_eq!(naming.derive("sync status"), "sync_status");
    }

    #[test]
    fn derivation_is_idempotent() {
        let naming = CommandNaming::default();
        let once = naming.derive("order:update-status");
        assert_eq!(naming.derive(&once), once);
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(CommandNaming::default().derive("approveOrder"), "approveOrder");
    }

    #[test]
    fn custom_separator_is_used() {
        assert_eq!(CommandNaming::new('+').derive("a:b-c"), "a+b+c");
    }
}
