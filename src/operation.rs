//! Operation descriptors.
//!
//! A descriptor is one catalog entry: a function or operator overload with its
//! parameter slots, its return type, and the flags the selector filters on.
//! Function-style descriptors render as `name(a, b)`, pattern-style ones
//! substitute their arguments into `$` placeholders, e.g. `$ AT TIME ZONE $::TEXT`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::datatype::ReturnTypeSpec;
use crate::error::{ConcordError, Result};
use crate::param::ParameterSpec;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\$").unwrap();
    static ref FUNCTION_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

// ------------- Relevance -------------
/// How often the generator should exercise a descriptor. Ordered from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    ExtremeLow,
    Low,
    #[default]
    Default,
    High,
    ExtremeHigh,
}

impl Relevance {
    pub fn weight(self) -> usize {
        match self {
            Relevance::ExtremeLow => 1,
            Relevance::Low => 2,
            Relevance::Default => 4,
            Relevance::High => 6,
            Relevance::ExtremeHigh => 8,
        }
    }
}

// ------------- Rendering -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rendering {
    Function { name: String },
    Pattern { pattern: String },
}

impl Rendering {
    pub fn name(&self) -> &str {
        match self {
            Rendering::Function { name } => name,
            Rendering::Pattern { pattern } => pattern,
        }
    }
    pub fn placeholders(&self) -> Option<usize> {
        match self {
            Rendering::Function { .. } => None,
            Rendering::Pattern { pattern } => Some(PLACEHOLDER.find_iter(pattern).count()),
        }
    }
    fn apply<S: AsRef<str>>(&self, args: &[S]) -> String {
        match self {
            Rendering::Function { name } => {
                let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
                format!("{}({})", name, args.join(", "))
            }
            Rendering::Pattern { pattern } => {
                let mut rendered = String::with_capacity(pattern.len());
                for (i, piece) in PLACEHOLDER.split(pattern).enumerate() {
                    if i > 0 {
                        rendered.push_str(args[i - 1].as_ref());
                    }
                    rendered.push_str(piece);
                }
                rendered
            }
        }
    }
}

// ------------- OperationDescriptor -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationDescriptor {
    rendering: Rendering,
    parameters: Vec<ParameterSpec>,
    return_type: ReturnTypeSpec,
    #[serde(default)]
    relevance: Relevance,
    enabled: bool,
    reference_compatible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl OperationDescriptor {
    fn new(
        rendering: Rendering,
        parameters: Vec<ParameterSpec>,
        return_type: ReturnTypeSpec,
    ) -> Self {
        Self {
            rendering,
            parameters,
            return_type,
            relevance: Relevance::Default,
            enabled: true,
            reference_compatible: true,
            comment: None,
        }
    }
    pub fn function(
        name: &str,
        parameters: Vec<ParameterSpec>,
        return_type: ReturnTypeSpec,
    ) -> Self {
        Self::new(
            Rendering::Function { name: name.to_owned() },
            parameters,
            return_type,
        )
    }
    pub fn pattern(
        pattern: &str,
        parameters: Vec<ParameterSpec>,
        return_type: ReturnTypeSpec,
    ) -> Self {
        Self::new(
            Rendering::Pattern { pattern: pattern.to_owned() },
            parameters,
            return_type,
        )
    }
    pub fn relevance(mut self, relevance: Relevance) -> Self {
        self.relevance = relevance;
        self
    }
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
    /// Marks whether the reference engine is expected to agree with this operation.
    pub fn reference_compatible(mut self, compatible: bool) -> Self {
        self.reference_compatible = compatible;
        self
    }
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_owned());
        self
    }

    pub fn name(&self) -> &str {
        self.rendering.name()
    }
    pub fn rendering(&self) -> &Rendering {
        &self.rendering
    }
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
    pub fn return_type(&self) -> &ReturnTypeSpec {
        &self.return_type
    }
    pub fn get_relevance(&self) -> Relevance {
        self.relevance
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    pub fn is_reference_compatible(&self) -> bool {
        self.reference_compatible
    }
    pub fn get_comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Renders the operation with one argument per slot, left to right.
    pub fn render<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        if args.len() != self.arity() {
            return Err(ConcordError::malformed(
                self.name(),
                format!("expected {} arguments, got {}", self.arity(), args.len()),
            ));
        }
        if let Some(placeholders) = self.rendering.placeholders() {
            if placeholders != args.len() {
                return Err(ConcordError::malformed(
                    self.name(),
                    format!(
                        "pattern has {} placeholders for {} arguments",
                        placeholders,
                        args.len()
                    ),
                ));
            }
        }
        Ok(self.rendering.apply(args))
    }

    /// Human-readable overload signature, e.g.
    /// `date_trunc(DATE_TIME_COMPONENT, INTERVAL) -> INTERVAL`.
    pub fn signature(&self) -> String {
        let slots: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        let shape = match self.rendering.placeholders() {
            Some(n) if n == slots.len() => self.rendering.apply(&slots),
            Some(_) => self.rendering.name().to_owned(),
            None => self.rendering.apply(&slots),
        };
        format!("{} -> {}", shape, self.return_type)
    }

    pub fn validate(&self) -> Result<()> {
        match &self.rendering {
            Rendering::Function { name } if !FUNCTION_NAME.is_match(name) => {
                return Err(ConcordError::malformed(name, "not a valid function name"));
            }
            Rendering::Pattern { pattern } => {
                let placeholders = PLACEHOLDER.find_iter(pattern).count();
                if placeholders != self.arity() {
                    return Err(ConcordError::malformed(
                        pattern,
                        format!(
                            "pattern has {} placeholders but {} parameters are declared",
                            placeholders,
                            self.arity()
                        ),
                    ));
                }
            }
            _ => (),
        }
        for (slot, param) in self.parameters.iter().enumerate() {
            param.validate().map_err(|reason| {
                ConcordError::malformed(self.name(), format!("slot {slot}: {reason}"))
            })?;
        }
        self.return_type
            .validate()
            .map_err(|reason| ConcordError::malformed(self.name(), reason))
    }
}
impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}
