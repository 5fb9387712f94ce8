//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod rules;

pub(crate) use convert::ConvertArgs;
pub(crate) use rules::RulesArgs;
