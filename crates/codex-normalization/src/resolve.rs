//! Binding canonical fields to source columns.

use std::fmt;

use codex_model::{CanonicalField, CodeSystemConfig, ColumnStrategy, ConfigError, RawRecord, RawTable};

/// Where a canonical field's value comes from in each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Index(usize),
    /// Values at `indices` joined with `separator`, empty parts skipped.
    Joined {
        indices: Vec<usize>,
        separator: String,
    },
}

impl ColumnSource {
    /// Extract the value from one record. `None` when every part is missing.
    pub fn extract(&self, record: &RawRecord) -> Option<String> {
        match self {
            Self::Index(index) => record.get(*index).map(str::to_string),
            Self::Joined { indices, separator } => {
                let parts: Vec<&str> = indices
                    .iter()
                    .filter_map(|index| record.get(*index))
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(separator))
                }
            }
        }
    }
}

/// How a field was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A configured strategy matched.
    Strategy(ColumnStrategy),
    /// No strategy matched; the positional fallback was used.
    PositionalFallback(usize),
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::PositionalFallback(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strategy(strategy) => write!(f, "{strategy}"),
            Self::PositionalFallback(position) => {
                write!(f, "positional fallback to position {position}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub field: CanonicalField,
    pub source: ColumnSource,
    pub resolution: Resolution,
    /// Later strategies that also resolved, consulted in order when a row's
    /// primary value is blank.
    pub alternates: Vec<ColumnSource>,
}

impl ResolvedColumn {
    /// The first non-blank value for `record`, starting with the primary source.
    pub fn extract(&self, record: &RawRecord) -> Option<String> {
        std::iter::once(&self.source)
            .chain(&self.alternates)
            .filter_map(|source| source.extract(record))
            .find(|value| !value.trim().is_empty())
    }
}

/// Code and description columns for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub code: ResolvedColumn,
    pub description: ResolvedColumn,
}

/// Resolve both canonical fields, before any row is processed.
pub fn resolve_columns(
    table: &RawTable,
    config: &CodeSystemConfig,
) -> Result<ColumnSelection, ConfigError> {
    Ok(ColumnSelection {
        code: resolve_field(table, config, CanonicalField::Code)?,
        description: resolve_field(table, config, CanonicalField::Description)?,
    })
}

fn resolve_field(
    table: &RawTable,
    config: &CodeSystemConfig,
    field: CanonicalField,
) -> Result<ResolvedColumn, ConfigError> {
    let strategies = config.strategies(field);
    for (index, strategy) in strategies.iter().enumerate() {
        if let Some(source) = try_strategy(table, strategy) {
            let alternates = strategies[index + 1..]
                .iter()
                .filter_map(|later| try_strategy(table, later))
                .filter(|later| *later != source)
                .collect();
            return Ok(ResolvedColumn {
                field,
                source,
                resolution: Resolution::Strategy(strategy.clone()),
                alternates,
            });
        }
        tracing::debug!(profile = %config.name, %field, strategy = %strategy, "strategy did not resolve");
    }

    let fallback = match field {
        CanonicalField::Code => 0,
        CanonicalField::Description => 1,
    };
    if config.positional_fallback && fits(table, fallback) {
        return Ok(ResolvedColumn {
            field,
            source: ColumnSource::Index(fallback),
            resolution: Resolution::PositionalFallback(fallback),
            alternates: Vec::new(),
        });
    }

    Err(ConfigError::MissingColumn {
        profile: config.name.clone(),
        field,
        tried: strategies.iter().map(ToString::to_string).collect(),
    })
}

fn try_strategy(table: &RawTable, strategy: &ColumnStrategy) -> Option<ColumnSource> {
    match strategy {
        ColumnStrategy::Named { name } => table.header_index(name).map(ColumnSource::Index),
        ColumnStrategy::Position { position } => {
            fits(table, *position).then_some(ColumnSource::Index(*position))
        }
        ColumnStrategy::Joined { join, separator } => {
            let indices = join
                .iter()
                .map(|name| table.header_index(name))
                .collect::<Option<Vec<_>>>()?;
            Some(ColumnSource::Joined {
                indices,
                separator: separator.clone(),
            })
        }
    }
}

/// A position is addressable when it is inside the table width. A table with
/// no header and no records accepts any position.
fn fits(table: &RawTable, position: usize) -> bool {
    table.width().is_none_or(|width| position < width)
}
