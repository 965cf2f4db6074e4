//! # Section Layout
//!
//! Sectioned boards group their blocks into ordered sections. Each section
//! renders its blocks in one or two columns and the sections themselves can
//! be reordered as a whole.
//!
//! Blocks point at their section through [`Block::section`]; the layout
//! only owns the order and width of the sections. A block whose section is
//! missing from the layout is shown ungrouped after every section.

use crate::arrangement::Arrangement;
use crate::{Block, DeckError, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// COLUMNS
// =============================================================================

/// How many columns a section lays its blocks out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Columns {
    One,
    Two,
}

impl Columns {
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for Columns {
    type Error = DeckError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(DeckError::InvalidColumns(other)),
        }
    }
}

impl From<Columns> for u8 {
    fn from(columns: Columns) -> Self {
        columns.count()
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// One section of a sectioned board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "sectionId")]
    pub id: SectionId,
    pub cols: Columns,
}

impl Section {
    #[must_use]
    pub fn new(id: SectionId, cols: Columns) -> Self {
        Self { id, cols }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Ordered sections with unique ids. Empty on boards without sections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionLayout {
    sections: Vec<Section>,
}

impl SectionLayout {
    /// Build a layout, rejecting duplicate ids.
    pub fn new(sections: Vec<Section>) -> Result<Self, DeckError> {
        let mut seen = BTreeSet::new();
        for section in &sections {
            if !seen.insert(&section.id) {
                return Err(DeckError::DuplicateSection(section.id.clone()));
            }
        }
        Ok(Self { sections })
    }

    pub(crate) fn from_unique(sections: Vec<Section>) -> Self {
        debug_assert!(Self::new(sections.clone()).is_ok());
        Self { sections }
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|s| &s.id)
    }

    /// Group `arrangement` by section, in layout order.
    ///
    /// Blocks keep their arrangement order inside a section.
    #[must_use]
    pub fn group<'a>(&'a self, arrangement: &'a Arrangement) -> Grouping<'a> {
        let sections = self
            .sections
            .iter()
            .map(|section| SectionGroup {
                section,
                blocks: arrangement
                    .blocks()
                    .iter()
                    .filter(|b| b.section.as_ref() == Some(&section.id))
                    .collect(),
            })
            .collect();
        let loose = arrangement
            .blocks()
            .iter()
            .filter(|b| b.section.as_ref().is_none_or(|id| !self.contains(id)))
            .collect();
        Grouping { sections, loose }
    }
}

impl TryFrom<Vec<Section>> for SectionLayout {
    type Error = DeckError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        Self::new(sections)
    }
}

impl From<SectionLayout> for Vec<Section> {
    fn from(layout: SectionLayout) -> Self {
        layout.sections
    }
}

/// A section with the blocks it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionGroup<'a> {
    pub section: &'a Section,
    pub blocks: Vec<&'a Block>,
}

/// An arrangement grouped by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grouping<'a> {
    pub sections: Vec<SectionGroup<'a>>,
    /// Blocks without a known section.
    pub loose: Vec<&'a Block>,
}
