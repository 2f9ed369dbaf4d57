use crate::argument::Argument;
use crate::types::Value;
use indexmap::IndexMap;

/// How many tokens an argument consumes per occurrence and how occurrences combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value; presence means `true`.
    Switch,
    /// One value, the last occurrence wins.
    One,
    /// One value per occurrence (flags) or every remaining token (variadic).
    Many,
}

/// Flag strings split into the engine's primary and alias slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub short: Option<char>,
    pub long: Option<String>,
    pub short_aliases: Vec<char>,
    pub long_aliases: Vec<String>,
}

impl FlagSet {
    pub(crate) fn push(&mut self, flag: &ParsedFlag) {
        match flag {
            ParsedFlag::Short(c) if self.short.is_none() => self.short = Some(*c),
            ParsedFlag::Short(c) => self.short_aliases.push(*c),
            ParsedFlag::Long(l) if self.long.is_none() => self.long = Some(l.clone()),
            ParsedFlag::Long(l) => self.long_aliases.push(l.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ParsedFlag {
    Short(char),
    Long(String),
}

impl ParsedFlag {
    /// `-x` or `--word`, where a word is alphanumeric with inner `-` or `_`.
    pub(crate) fn parse(flag: &str) -> Option<Self> {
        if let Some(long) = flag.strip_prefix("--") {
            let valid = long.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
                && long.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            return valid.then(|| ParsedFlag::Long(long.to_string()));
        }
        let short = flag.strip_prefix('-')?;
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Some(ParsedFlag::Short(c)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Flag(FlagSet),
    /// Zero-based position among the positionals.
    Positional(usize),
}

/// One compiled argument, tied to its descriptor by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub argument: Argument,
    pub placement: Placement,
    pub arity: Arity,
    /// Whether the engine must see the argument. False for members of a
    /// required exclusive group, whose group carries the requirement.
    pub required: bool,
    /// Declared or implied default, already conformed to the declared type.
    pub default: Option<Value>,
    /// Help text with the default rendered in.
    pub help: Option<String>,
    pub heading: Option<String>,
}

impl Field {
    pub fn name(&self) -> &str {
        self.argument.name()
    }
}

/// Zero-argument flag that stands for `target` set to `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasEntry {
    pub id: String,
    pub flags: FlagSet,
    pub target: String,
    pub value: Value,
}

/// Engine group over member ids. Exclusive groups admit one member; the
/// group of a required aliased flag admits the primary and its aliases together.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub required: bool,
    pub multiple: bool,
}

/// Resolved parser description. Compiling the same declaration twice yields equal plans.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserPlan {
    pub name: String,
    pub about: Option<String>,
    pub usage: Option<String>,
    pub epilog: Option<String>,
    pub fields: Vec<Field>,
    pub aliases: Vec<AliasEntry>,
    /// Help headings in first-seen order.
    pub headings: Vec<String>,
    pub clusters: Vec<Cluster>,
    pub subcommands: IndexMap<String, ParserPlan>,
    pub subcommand_required: bool,
}

impl ParserPlan {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn positionals(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| matches!(f.placement, Placement::Positional(_)))
    }

    pub fn aliases_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AliasEntry> {
        self.aliases.iter().filter(move |a| a.target == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_syntax() {
        assert_eq!(ParsedFlag::parse("-v"), Some(ParsedFlag::Short('v')));
        assert_eq!(ParsedFlag::parse("--dry-run"), Some(ParsedFlag::Long("dry-run".into())));
        assert_eq!(ParsedFlag::parse("-vv"), None);
        assert_eq!(ParsedFlag::parse("--"), None);
        assert_eq!(ParsedFlag::parse("---x"), None);
        assert_eq!(ParsedFlag::parse("name"), None);
        assert_eq!(ParsedFlag::parse("--a b"), None);
    }

    #[test]
    fn flag_set_fills_primary_slots_first() {
        let mut set = FlagSet::default();
        for flag in ["-n", "--name", "-N", "--nm"] {
            set.push(&ParsedFlag::parse(flag).unwrap());
        }
        assert_eq!(set.short, Some('n'));
        assert_eq!(set.long.as_deref(), Some("name"));
        assert_eq!(set.short_aliases, vec!['N']);
        assert_eq!(set.long_aliases, vec!["nm".to_string()]);
    }
}
