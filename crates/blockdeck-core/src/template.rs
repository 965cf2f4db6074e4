//! # Board Templates
//!
//! What a board starts with when nothing is persisted, and what `reset`
//! restores: the shown blocks, the section layout, and the widget pool
//! that replacements are drawn from.

use crate::arrangement::{Arrangement, default_dashboard};
use crate::layout::{Columns, Section, SectionLayout};
use crate::{Block, BlockId, ChartStyle, DeckError, SectionId};
use serde::{Deserialize, Serialize};

/// Defaults of a board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardTemplate {
    pub blocks: Arrangement,
    pub sections: SectionLayout,
    /// Every block that may be shown. Blocks of `blocks` are part of it.
    pub pool: Arrangement,
}

impl From<Arrangement> for BoardTemplate {
    /// A template without sections whose pool is exactly `blocks`.
    fn from(blocks: Arrangement) -> Self {
        Self {
            pool: blocks.clone(),
            blocks,
            sections: SectionLayout::default(),
        }
    }
}

/// Which built-in template a board uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Four blocks in one list, two spare widgets in the pool.
    #[default]
    Basic,
    /// Candidate report: nine charts in six sections.
    Sectioned,
}

impl TemplateKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sectioned => "sectioned",
        }
    }

    #[must_use]
    pub fn build(self) -> BoardTemplate {
        match self {
            Self::Basic => basic_template(),
            Self::Sectioned => sectioned_template(),
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "sectioned" => Ok(Self::Sectioned),
            other => Err(DeckError::ConfigError(format!(
                "Unknown template '{other}' (expected basic or sectioned)"
            ))),
        }
    }
}

/// The default dashboard plus `text-3` and a line chart `chart-3` in reserve.
#[must_use]
pub fn basic_template() -> BoardTemplate {
    let blocks = default_dashboard();
    let spares = [
        BlockId::parse("text-3").map(Block::text),
        BlockId::parse("chart-3").map(|id| Block::chart(id, ChartStyle::Line)),
    ];
    let pool = blocks
        .blocks()
        .iter()
        .cloned()
        .map(Ok)
        .chain(spares)
        .collect::<Result<Vec<_>, DeckError>>()
        .and_then(Arrangement::new)
        .unwrap_or_else(|_| blocks.clone());
    BoardTemplate {
        blocks,
        sections: SectionLayout::default(),
        pool,
    }
}

/// `(section, cols)` in display order.
const REPORT_SECTIONS: [(&str, u8); 6] = [
    ("sec1", 1),
    ("sec2", 2),
    ("sec3", 2),
    ("sec4", 1),
    ("sec5", 2),
    ("sec6", 1),
];

/// `(block, section, title, color, style)` in display order.
const REPORT_BLOCKS: [(&str, &str, &str, &str, ChartStyle); 9] = [
    ("sec1-a", "sec1", "Overall Assessment", "#6366f1", ChartStyle::Bar),
    ("sec2-a", "sec2", "CV Assessment", "#06b6d4", ChartStyle::Bar),
    ("sec2-b", "sec2", "CV Breakdown", "#06b6d4", ChartStyle::Radar),
    ("sec3-a", "sec3", "Initial Assessment", "#f59e0b", ChartStyle::Line),
    ("sec3-b", "sec3", "Initial Breakdown", "#f59e0b", ChartStyle::Pie),
    ("sec4-a", "sec4", "Hiring-Critical Skills", "#10b981", ChartStyle::RadialBar),
    ("sec5-a", "sec5", "Authenticity Score", "#8b5cf6", ChartStyle::Pie),
    ("sec5-b", "sec5", "Compliance Check", "#8b5cf6", ChartStyle::Bar),
    ("sec6-a", "sec6", "Candidate Experience", "#ec4899", ChartStyle::Line),
];

fn report_layout() -> Result<(SectionLayout, Arrangement), DeckError> {
    let sections = REPORT_SECTIONS
        .iter()
        .map(|&(id, cols)| Ok(Section::new(SectionId::parse(id)?, Columns::try_from(cols)?)))
        .collect::<Result<Vec<_>, DeckError>>()?;
    let blocks = REPORT_BLOCKS
        .iter()
        .map(|&(id, section, title, color, style)| {
            Ok(Block::chart(BlockId::parse(id)?, style)
                .in_section(SectionId::parse(section)?)
                .labelled(title, color))
        })
        .collect::<Result<Vec<_>, DeckError>>()?;
    Ok((SectionLayout::new(sections)?, Arrangement::new(blocks)?))
}

/// The sectioned candidate report.
#[must_use]
pub fn sectioned_template() -> BoardTemplate {
    match report_layout() {
        Ok((sections, blocks)) => BoardTemplate {
            pool: blocks.clone(),
            blocks,
            sections,
        },
        Err(error) => {
            tracing::error!(%error, "built-in sectioned template is invalid");
            BoardTemplate::default()
        }
    }
}
