//! Static command catalog.
//!
//! Maps command names to canned responses. Lookup is verbatim and
//! case-sensitive: `"help"` matches, `"Help"` and `" help"` do not.

/// Response used for any name missing from the catalog.
pub const NOT_FOUND: &str = r#"Command not found. Type "help" for a list of commands."#;

/// What a catalog entry does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Reveal a canned multi-line response.
    Respond(&'static str),
    /// Empty the output buffer immediately, no animation.
    Clear,
}

/// A single named command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: &'static str,
    pub kind: CommandKind,
    /// Top-level command this entry refines (`"work 1"` refines `"work"`).
    pub parent: Option<&'static str>,
}

impl CommandEntry {
    pub const fn respond(name: &'static str, text: &'static str) -> Self {
        Self { name, kind: CommandKind::Respond(text), parent: None }
    }

    pub const fn sub(name: &'static str, parent: &'static str, text: &'static str) -> Self {
        Self { name, kind: CommandKind::Respond(text), parent: Some(parent) }
    }

    pub const fn clear() -> Self {
        Self { name: "clear", kind: CommandKind::Clear, parent: None }
    }

    pub fn is_sub_command(&self) -> bool {
        self.parent.is_some()
    }
}

/// Result of resolving a raw command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Lines to reveal, already trimmed. Blank lines are kept.
    Lines(Vec<String>),
    Clear,
}

const HELP: &str = "
    Available commands:
    - help: List all commands
    - projects: List my projects
    - education: Show my education history
    - work: Show previous work experience
    - certifications: Show certifications
";

const PROJECTS: &str = "
    Projects:
    - Portfolio Website
    - Minecraft Q/A Chatbot
    - Video Conferencing Application
";

const EDUCATION: &str = "
    Education:
    - M.S. Computer Science - University of Texas at Dallas (2024)
    - B.S. Computer Science - University of Texas at Dallas (2022)
";

const WORK: &str = "
    Work Experience:
    - Software Engineer at E-MetroTel (2022-2023)
    - Software Developer Intern at E-MetroTel (2022)
";

const WORK_1: &str = "
    Software Engineer at E-MetroTel (2022-2023)

    - Built and maintained features for the UCx unified communications platform
    - Developed REST endpoints and admin web pages for telephony configuration
    - Automated regression testing of call-routing scenarios
    - Worked with support to triage and fix customer-reported defects
";

const WORK_2: &str = "
    Software Developer Intern at E-MetroTel (2022)

    - Implemented internal tooling for provisioning test phone systems
    - Fixed UI defects in the web management console
    - Wrote documentation for onboarding new developers
";

const CERTIFICATIONS: &str = "
    Certifications:
    - AWS Certified Cloud Practitioner (2024)
";

/// The fixed table of commands, in display order.
const ENTRIES: &[CommandEntry] = &[
    CommandEntry::respond("help", HELP),
    CommandEntry::respond("projects", PROJECTS),
    CommandEntry::respond("education", EDUCATION),
    CommandEntry::respond("work", WORK),
    CommandEntry::respond("certifications", CERTIFICATIONS),
    CommandEntry::sub("work 1", "work", WORK_1),
    CommandEntry::sub("work 2", "work", WORK_2),
    CommandEntry::clear(),
];

/// Immutable command table.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    entries: &'static [CommandEntry],
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandCatalog {
    pub fn new() -> Self {
        Self { entries: ENTRIES }
    }

    /// Build a catalog over a custom table.
    #[cfg(test)]
    pub fn with_entries(entries: &'static [CommandEntry]) -> Self {
        Self { entries }
    }

    /// Exact lookup by name.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Resolve a raw command. Misses resolve to the not-found line.
    pub fn resolve(&self, command: &str) -> Resolved {
        match self.get(command).map(|e| e.kind) {
            Some(CommandKind::Respond(text)) => Resolved::Lines(split_response(text)),
            Some(CommandKind::Clear) => Resolved::Clear,
            None => Resolved::Lines(vec![NOT_FOUND.to_string()]),
        }
    }

    /// All entries in declaration order.
    #[cfg(test)]
    pub fn entries(&self) -> &[CommandEntry] {
        self.entries
    }

    /// Top-level commands that produce a response (the button row).
    pub fn top_level(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries
            .iter()
            .filter(|e| !e.is_sub_command() && matches!(e.kind, CommandKind::Respond(_)))
    }

    /// Sub-commands refining `parent`.
    pub fn sub_commands<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a CommandEntry> + 'a {
        self.entries.iter().filter(move |e| e.parent == Some(parent))
    }

    /// Top-level commands that have at least one sub-command.
    pub fn parents(&self) -> Vec<&'static str> {
        let mut parents: Vec<&'static str> = Vec::new();
        for parent in self.entries.iter().filter_map(|e| e.parent) {
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        parents
    }
}

/// Outer trim, split on newlines, trim each line.
pub fn split_response(text: &str) -> Vec<String> {
    text.trim().split('\n').map(|line| line.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(resolved: Resolved) -> Vec<String> {
        match resolved {
            Resolved::Lines(lines) => lines,
            Resolved::Clear => panic!("expected lines, got clear"),
        }
    }

    #[test]
    fn test_resolve_known_command() {
        let catalog = CommandCatalog::new();
        let help = lines(catalog.resolve("help"));
        assert_eq!(help.len(), 6);
        assert_eq!(help[0], "Available commands:");
        assert_eq!(help[1], "- help: List all commands");
        assert_eq!(help[5], "- certifications: Show certifications");
    }

    #[test]
    fn test_resolve_is_verbatim() {
        let catalog = CommandCatalog::new();
        for raw in ["Help", " help", "help ", "HELP", "work1", "xyz", ""] {
            assert_eq!(lines(catalog.resolve(raw)), vec![NOT_FOUND.to_string()], "{:?}", raw);
        }
    }

    #[test]
    fn test_compound_command() {
        let catalog = CommandCatalog::new();
        let detail = lines(catalog.resolve("work 1"));
        let summary = lines(catalog.resolve("work"));
        assert_eq!(detail[0], "Software Engineer at E-MetroTel (2022-2023)");
        assert_eq!(detail[1], "");
        assert_ne!(detail, summary);
        assert_eq!(summary[0], "Work Experience:");
    }

    #[test]
    fn test_clear_entry() {
        let catalog = CommandCatalog::new();
        assert_eq!(catalog.resolve("clear"), Resolved::Clear);
    }

    #[test]
    fn test_top_level_and_sub_commands() {
        let catalog = CommandCatalog::new();
        let top: Vec<_> = catalog.top_level().map(|e| e.name).collect();
        assert_eq!(top, vec!["help", "projects", "education", "work", "certifications"]);

        let subs: Vec<_> = catalog.sub_commands("work").map(|e| e.name).collect();
        assert_eq!(subs, vec!["work 1", "work 2"]);
        assert_eq!(catalog.parents(), vec!["work"]);
        assert_eq!(catalog.sub_commands("help").count(), 0);
    }

    #[test]
    fn test_help_lists_every_top_level_command() {
        let catalog = CommandCatalog::new();
        let help = lines(catalog.resolve("help"));
        for entry in catalog.top_level() {
            let prefix = format!("- {}:", entry.name);
            assert!(help.iter().any(|l| l.starts_with(&prefix)), "missing {}", entry.name);
        }
    }

    #[test]
    fn test_split_response_keeps_interior_blank_lines() {
        assert_eq!(
            split_response("\n   a\n\n   b  \n"),
            vec!["a".to_string(), String::new(), "b".to_string()]
        );
    }
}
