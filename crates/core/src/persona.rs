//! The salesperson persona and the system instruction built from it.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::inventory::Inventory;

const CONCISE_TEMPLATE: &str = include_str!("./persona/concise.md");
const DELIBERATIVE_TEMPLATE: &str = include_str!("./persona/deliberative.md");
const NAME_PLACEHOLDER: &str = "{{AGENT_NAME}}";

/// The persona name used when none is configured.
pub const DEFAULT_PERSONA_NAME: &str = "Hengyi";

/// Which instruction template the persona follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PersonaStyle {
    /// Behavior rules and response templates only.
    #[default]
    Concise,
    /// Adds a thinking framework and internal dialogue guidelines on top of
    /// the concise rules.
    Deliberative,
}

impl PersonaStyle {
    #[inline]
    fn template(self) -> &'static str {
        match self {
            PersonaStyle::Concise => CONCISE_TEMPLATE,
            PersonaStyle::Deliberative => DELIBERATIVE_TEMPLATE,
        }
    }
}

impl Display for PersonaStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaStyle::Concise => write!(f, "concise"),
            PersonaStyle::Deliberative => write!(f, "deliberative"),
        }
    }
}

impl FromStr for PersonaStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(PersonaStyle::Concise),
            "deliberative" => Ok(PersonaStyle::Deliberative),
            other => Err(format!("unknown persona style `{other}`")),
        }
    }
}

/// The role the model plays.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Persona {
    name: String,
    style: PersonaStyle,
}

impl Persona {
    /// Creates a persona with the given display name and style.
    #[inline]
    pub fn new<S: Into<String>>(name: S, style: PersonaStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    /// Returns the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template style.
    #[inline]
    pub fn style(&self) -> PersonaStyle {
        self.style
    }

    /// Builds the system instruction: the fixed template with the persona
    /// name filled in, followed by the rendered inventory.
    ///
    /// The output only depends on the persona and the inventory, so it is
    /// cheap to call on every turn.
    pub fn render(&self, inventory: &Inventory) -> String {
        let mut prompt =
            self.style.template().replace(NAME_PLACEHOLDER, &self.name);
        prompt.push_str(&inventory.render());
        prompt
    }
}

impl Default for Persona {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA_NAME, PersonaStyle::default())
    }
}
