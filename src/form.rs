//! Form state and the document builder.
//!
//! [`FormState`] holds the raw input values exactly as typed, the keyword set and
//! the dynamically added revision blocks. [`FormState::build_document`] is the
//! single read-and-assemble step used by the preview, the PDF and the
//! submission paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{parse_year, ReportDocument, Responsible, RevisionEntry};
use crate::keywords::KeywordSet;

/// Named single-value inputs of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Title,
    Kind,
    Year,
    Status,
    SubmittedAt,
    ResponsibleName,
    ResponsibleRole,
    ResponsibleDepartment,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::Kind,
        Field::Year,
        Field::Status,
        Field::SubmittedAt,
        Field::ResponsibleName,
        Field::ResponsibleRole,
        Field::ResponsibleDepartment,
    ];

    /// Input identifier used on the form.
    pub fn input_id(self) -> &'static str {
        match self {
            Field::Title => "titulo",
            Field::Kind => "tipo",
            Field::Year => "ano",
            Field::Status => "status",
            Field::SubmittedAt => "data_envio",
            Field::ResponsibleName => "nome_responsavel",
            Field::ResponsibleRole => "cargo_responsavel",
            Field::ResponsibleDepartment => "departamento_responsavel",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_id())
    }
}

/// Error returned when parsing an unknown field or revision input name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown form input '{0}'")]
pub struct UnknownInput(pub String);

impl FromStr for Field {
    type Err = UnknownInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.input_id() == s)
            .ok_or_else(|| UnknownInput(s.to_owned()))
    }
}

/// Inputs of a revision block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevisionField {
    Timestamp,
    Reviewer,
    Comment,
}

impl RevisionField {
    /// Input class used inside a revision block.
    pub fn input_class(self) -> &'static str {
        match self {
            RevisionField::Timestamp => "data_revisao",
            RevisionField::Reviewer => "revisado_por",
            RevisionField::Comment => "comentario_revisao",
        }
    }
}

impl FromStr for RevisionField {
    type Err = UnknownInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data_revisao" | "data" => Ok(RevisionField::Timestamp),
            "revisado_por" => Ok(RevisionField::Reviewer),
            "comentario_revisao" | "comentario" => Ok(RevisionField::Comment),
            other => Err(UnknownInput(other.to_owned())),
        }
    }
}

/// One dynamically added revision block. All three inputs are required on the form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionBlock {
    #[serde(default, rename = "data")]
    pub timestamp: String,
    #[serde(default, rename = "revisado_por")]
    pub reviewer: String,
    #[serde(default, rename = "comentario")]
    pub comment: String,
}

impl RevisionBlock {
    /// Names of the inputs that are still empty.
    pub fn missing_inputs(&self) -> Vec<&'static str> {
        [
            (RevisionField::Timestamp, &self.timestamp),
            (RevisionField::Reviewer, &self.reviewer),
            (RevisionField::Comment, &self.comment),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.input_class())
        .collect()
    }

    fn set(&mut self, field: RevisionField, value: String) {
        match field {
            RevisionField::Timestamp => self.timestamp = value,
            RevisionField::Reviewer => self.reviewer = value,
            RevisionField::Comment => self.comment = value,
        }
    }

    fn to_entry(&self) -> RevisionEntry {
        RevisionEntry {
            timestamp: self.timestamp.clone(),
            reviewer: self.reviewer.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// Current on-screen form values.
///
/// Deserializes from the JSON snapshots accepted by the CLI; every key is
/// optional and keys mirror the form input identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub titulo: String,
    pub tipo: String,
    pub ano: String,
    pub status: String,
    pub data_envio: String,
    pub nome_responsavel: String,
    pub cargo_responsavel: String,
    pub departamento_responsavel: String,
    pub palavras_chaves: KeywordSet,
    pub revisoes: Vec<RevisionBlock>,
}

impl FormState {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of `field`.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.titulo,
            Field::Kind => &self.tipo,
            Field::Year => &self.ano,
            Field::Status => &self.status,
            Field::SubmittedAt => &self.data_envio,
            Field::ResponsibleName => &self.nome_responsavel,
            Field::ResponsibleRole => &self.cargo_responsavel,
            Field::ResponsibleDepartment => &self.departamento_responsavel,
        }
    }

    /// Replaces the raw value of `field`.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.titulo,
            Field::Kind => &mut self.tipo,
            Field::Year => &mut self.ano,
            Field::Status => &mut self.status,
            Field::SubmittedAt => &mut self.data_envio,
            Field::ResponsibleName => &mut self.nome_responsavel,
            Field::ResponsibleRole => &mut self.cargo_responsavel,
            Field::ResponsibleDepartment => &mut self.departamento_responsavel,
        };
        *slot = value.into();
    }

    /// Keyword set backing the keyword list.
    pub fn keywords(&self) -> &KeywordSet {
        &self.palavras_chaves
    }

    /// Mutable access for the keyword editor.
    pub fn keywords_mut(&mut self) -> &mut KeywordSet {
        &mut self.palavras_chaves
    }

    /// Revision blocks in display order.
    pub fn revision_blocks(&self) -> &[RevisionBlock] {
        &self.revisoes
    }

    /// Appends an empty revision block and returns its zero-based index.
    pub fn add_revision_block(&mut self) -> usize {
        self.revisoes.push(RevisionBlock::default());
        self.revisoes.len() - 1
    }

    /// Updates one input of an existing revision block. Returns `false` for an unknown index.
    pub fn set_revision_field(
        &mut self,
        index: usize,
        field: RevisionField,
        value: impl Into<String>,
    ) -> bool {
        match self.revisoes.get_mut(index) {
            Some(block) => {
                block.set(field, value.into());
                true
            }
            None => false,
        }
    }

    /// Clears every input, the keyword set and all revision blocks.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Assembles a [`ReportDocument`] from the current values.
    ///
    /// Revision entries are produced one per block in display order. No value is
    /// validated here.
    pub fn build_document(&self) -> ReportDocument {
        ReportDocument {
            title: self.titulo.clone(),
            kind: self.tipo.clone(),
            year: parse_year(&self.ano),
            status: self.status.clone(),
            submitted_at: self.data_envio.clone(),
            responsible: Responsible {
                name: self.nome_responsavel.clone(),
                role: self.cargo_responsavel.clone(),
                department: self.departamento_responsavel.clone(),
            },
            keywords: self.palavras_chaves.clone(),
            revisions: self.revisoes.iter().map(RevisionBlock::to_entry).collect(),
        }
    }
}
