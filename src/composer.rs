//! Event dispatch for a report-composing session.
//!
//! Each user interaction is a [`Command`]. [`Composer::dispatch`] applies it to
//! the session state and answers with the [`Notice`]s the interface should show.
//! Failures never escape as errors: they become the alert notices users see.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::clipboard::{ClipboardSink, CopyButton};
use crate::config::ComposerConfig;
use crate::document::ReportDocument;
use crate::error::ComposerError;
use crate::fonts::FONTS_DIR_ENV;
use crate::form::{Field, FormState, RevisionField, UnknownInput};
use crate::keywords::{AddOutcome, KeywordSet};
use crate::preview::render_preview;
use crate::report_pdf::{self, PdfOptions};
use crate::submit::{SubmitError, Submitter};

/// Alert shown when a PDF is requested without a title.
pub const MISSING_TITLE_ALERT: &str = "Por favor, preencher o formulário antes de gerar o PDF.";
/// Alert shown when the service accepted the document.
pub const SUBMIT_SUCCESS_ALERT: &str = "Documento enviado com sucesso!";
/// Alert shown when the service could not be reached.
pub const CONNECTION_ALERT: &str = "Erro de conexão com o servidor.";
/// Alert shown when copying before any preview exists.
pub const EMPTY_PREVIEW_ALERT: &str = "Gere o documento JSON primeiro.";

/// A user interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// A single-value input changed.
    SetField(Field, String),
    /// Enter pressed in the keyword input holding `raw`.
    KeywordEnter(String),
    /// A rendered keyword was clicked.
    RemoveKeyword(String),
    /// The "add revision" control was clicked.
    AddRevision,
    /// An input of revision block `index` (zero-based) changed.
    SetRevisionField {
        index: usize,
        field: RevisionField,
        value: String,
    },
    /// The form was submitted.
    Submit,
    /// The "generate PDF" control was clicked.
    GeneratePdf,
    /// The copy control was clicked.
    CopyJson,
    /// The form was reset.
    Reset,
}

/// Feedback produced by a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The keyword list was re-rendered with these entries.
    KeywordsRendered(KeywordSet),
    /// The keyword input should be cleared.
    KeywordInputCleared,
    /// A revision block was appended; carries its one-based number.
    RevisionAdded(usize),
    /// The JSON preview area now shows this text.
    PreviewUpdated(String),
    /// A PDF was written to this path.
    PdfSaved(PathBuf),
    /// The preview was copied; the control now shows this label.
    Copied(&'static str),
    /// The form and its derived state were cleared.
    FormReset,
    /// A blocking message for the user.
    Alert(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::KeywordsRendered(keywords) if keywords.is_empty() => {
                write!(f, "palavras-chave: (nenhuma)")
            }
            Notice::KeywordsRendered(keywords) => {
                write!(f, "palavras-chave:\n{}", keywords.render_list())
            }
            Notice::KeywordInputCleared => write!(f, "campo de palavra-chave limpo"),
            Notice::RevisionAdded(number) => write!(f, "revisão {} adicionada", number),
            Notice::PreviewUpdated(text) => write!(f, "{}", text),
            Notice::PdfSaved(path) => write!(f, "PDF salvo em {}", path.display()),
            Notice::Copied(label) => write!(f, "{}", label),
            Notice::FormReset => write!(f, "formulário limpo"),
            Notice::Alert(message) => write!(f, "[alerta] {}", message),
        }
    }
}

/// One report-composing session.
pub struct Composer {
    form: FormState,
    preview: String,
    copy_button: CopyButton,
    pdf_options: PdfOptions,
    output_dir: PathBuf,
    submitter: Box<dyn Submitter>,
    clipboard: Box<dyn ClipboardSink>,
}

impl Composer {
    /// Creates a session with an empty form.
    pub fn new(
        config: &ComposerConfig,
        submitter: Box<dyn Submitter>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            form: FormState::new(),
            preview: String::new(),
            copy_button: CopyButton::new(config.copy_feedback()),
            pdf_options: PdfOptions {
                fonts_dir: config.fonts_dir.clone(),
            },
            output_dir: config.output_dir.clone(),
            submitter,
            clipboard,
        }
    }

    /// Replaces the form contents, e.g. with a loaded snapshot.
    pub fn with_form(mut self, form: FormState) -> Self {
        self.form = form;
        self
    }

    /// Current form values.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Text currently shown in the preview area.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Label of the copy control at `now`.
    pub fn copy_label(&self, now: Instant) -> &'static str {
        self.copy_button.label_at(now)
    }

    /// Builds the document from the current form state.
    pub fn build_document(&self) -> ReportDocument {
        self.form.build_document()
    }

    /// Applies `command` and returns the resulting notices.
    pub fn dispatch(&mut self, command: Command) -> Vec<Notice> {
        debug!("Dispatching {:?}", command);
        match command {
            Command::SetField(field, value) => {
                self.form.set_field(field, value);
                Vec::new()
            }
            Command::KeywordEnter(raw) => self.enter_keyword(&raw),
            Command::RemoveKeyword(value) => {
                if self.form.keywords_mut().remove(&value) {
                    vec![self.keywords_notice()]
                } else {
                    Vec::new()
                }
            }
            Command::AddRevision => {
                let index = self.form.add_revision_block();
                vec![Notice::RevisionAdded(index + 1)]
            }
            Command::SetRevisionField {
                index,
                field,
                value,
            } => {
                if self.form.set_revision_field(index, field, value) {
                    Vec::new()
                } else {
                    vec![Notice::Alert(format!("Revisão {} não existe.", index + 1))]
                }
            }
            Command::Submit => self.submit(),
            Command::GeneratePdf => self.generate_pdf(),
            Command::CopyJson => self.copy_json(Instant::now()),
            Command::Reset => {
                self.form.reset();
                vec![Notice::FormReset, self.keywords_notice()]
            }
        }
    }

    fn keywords_notice(&self) -> Notice {
        Notice::KeywordsRendered(self.form.keywords().clone())
    }

    fn enter_keyword(&mut self, raw: &str) -> Vec<Notice> {
        match self.form.keywords_mut().add(raw) {
            AddOutcome::Added => vec![Notice::KeywordInputCleared, self.keywords_notice()],
            AddOutcome::Duplicate | AddOutcome::Empty => Vec::new(),
        }
    }

    fn submit(&mut self) -> Vec<Notice> {
        if let Some((number, missing)) = self
            .form
            .revision_blocks()
            .iter()
            .enumerate()
            .map(|(index, block)| (index + 1, block.missing_inputs()))
            .find(|(_, missing)| !missing.is_empty())
        {
            debug!("Revision {} is missing {:?}", number, missing);
            return vec![Notice::Alert(format!(
                "Preencha todos os campos da revisão {}.",
                number
            ))];
        }

        let document = self.build_document();
        let mut notices = match self.refresh_preview() {
            Ok(text) => vec![Notice::PreviewUpdated(text.to_owned())],
            Err(err) => {
                error!("Failed to render preview: {}", err);
                return vec![Notice::Alert(err.to_string())];
            }
        };

        notices.push(Notice::Alert(match self.submitter.submit(&document) {
            Ok(()) => SUBMIT_SUCCESS_ALERT.to_owned(),
            Err(SubmitError::Rejected { message, .. }) => {
                format!("Erro ao enviar documento: {}", message)
            }
            Err(SubmitError::Transport { .. } | SubmitError::Client(_)) => {
                CONNECTION_ALERT.to_owned()
            }
        }));
        notices
    }

    /// Rebuilds the document and replaces the preview text with its extended JSON.
    pub fn refresh_preview(&mut self) -> Result<&str, ComposerError> {
        self.preview = render_preview(&self.build_document())?;
        Ok(&self.preview)
    }

    fn generate_pdf(&mut self) -> Vec<Notice> {
        let document = self.build_document();
        if !document.has_title() {
            info!("PDF generation aborted: missing title");
            return vec![Notice::Alert(MISSING_TITLE_ALERT.to_owned())];
        }

        let result = report_pdf::render_report(&document, &self.pdf_options).and_then(|report| {
            let path = self.output_dir.join(&report.file_name);
            fs::write(&path, &report.pdf.bytes).map_err(|source| ComposerError::Write {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        });

        match result {
            Ok(path) => {
                info!("Saved report PDF to {}", path.display());
                vec![Notice::PdfSaved(path)]
            }
            Err(ComposerError::MissingTitle) => vec![Notice::Alert(MISSING_TITLE_ALERT.to_owned())],
            Err(err) if report_pdf::is_font_error(&err) => {
                error!("PDF generation failed, no usable fonts: {}", err);
                vec![Notice::Alert(format!(
                    "Falha ao gerar o PDF: {} (defina {})",
                    err,
                    FONTS_DIR_ENV
                ))]
            }
            Err(err) => {
                error!("PDF generation failed: {}", err);
                vec![Notice::Alert(format!("Falha ao gerar o PDF: {}", err))]
            }
        }
    }

    /// Copies the preview text, acknowledging at `now`.
    pub fn copy_json(&mut self, now: Instant) -> Vec<Notice> {
        if self.preview.is_empty() {
            return vec![Notice::Alert(EMPTY_PREVIEW_ALERT.to_owned())];
        }

        match self.clipboard.set_text(&self.preview) {
            Ok(()) => {
                self.copy_button.acknowledge(now);
                vec![Notice::Copied(self.copy_button.label_at(now))]
            }
            Err(err) => {
                warn!("Copy to clipboard failed: {}", err);
                vec![Notice::Alert(format!("Falha ao copiar: {}", err))]
            }
        }
    }
}

/// Error returned by [`Command::from_str`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),
    #[error("invalid revision number '{0}'")]
    InvalidIndex(String),
    #[error(transparent)]
    UnknownInput(#[from] UnknownInput),
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(position) => (&input[..position], input[position..].trim_start()),
        None => (input, ""),
    }
}

/// Parses the session line syntax:
///
/// ```text
/// set <campo> <valor>           keyword <texto>        remove-keyword <texto>
/// add-revision                  revision <n> <campo> <valor>
/// submit    pdf    copy    reset
/// ```
impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, rest) = split_word(line.trim_end_matches(|ch: char| ch == '\r' || ch == '\n'));
        match name {
            "" => Err(CommandParseError::Empty),
            "set" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(CommandParseError::MissingArgument("set"));
                }
                Ok(Command::SetField(field.parse()?, value.to_owned()))
            }
            "keyword" => Ok(Command::KeywordEnter(rest.to_owned())),
            "remove-keyword" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument("remove-keyword"));
                }
                Ok(Command::RemoveKeyword(rest.to_owned()))
            }
            "add-revision" => Ok(Command::AddRevision),
            "revision" => {
                let (number, rest) = split_word(rest);
                let (field, value) = split_word(rest);
                if number.is_empty() || field.is_empty() {
                    return Err(CommandParseError::MissingArgument("revision"));
                }
                let index = number
                    .parse::<usize>()
                    .ok()
                    .and_then(|number| number.checked_sub(1))
                    .ok_or_else(|| CommandParseError::InvalidIndex(number.to_owned()))?;
                Ok(Command::SetRevisionField {
                    index,
                    field: field.parse()?,
                    value: value.to_owned(),
                })
            }
            "submit" => Ok(Command::Submit),
            "pdf" => Ok(Command::GeneratePdf),
            "copy" => Ok(Command::CopyJson),
            "reset" => Ok(Command::Reset),
            other => Err(CommandParseError::Unknown(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_notice_prints_bulleted_list() {
        let keywords = KeywordSet::from(vec!["rust".to_owned(), "pdf".to_owned()]);
        assert_eq!(
            Notice::KeywordsRendered(keywords).to_string(),
            "palavras-chave:\n• rust\n• pdf"
        );
        assert_eq!(
            Notice::KeywordsRendered(KeywordSet::new()).to_string(),
            "palavras-chave: (nenhuma)"
        );
    }

    #[test]
    fn parses_field_assignment_with_spaces() {
        let command: Command = "set titulo Annual Report".parse().unwrap();
        assert_eq!(
            command,
            Command::SetField(Field::Title, "Annual Report".to_owned())
        );
    }

    #[test]
    fn parses_revision_commands_with_one_based_numbers() {
        let command: Command = "revision 2 revisado_por Ana Souza".parse().unwrap();
        assert_eq!(
            command,
            Command::SetRevisionField {
                index: 1,
                field: RevisionField::Reviewer,
                value: "Ana Souza".to_owned(),
            }
        );
        assert_eq!(
            "revision 0 data x".parse::<Command>(),
            Err(CommandParseError::InvalidIndex("0".to_owned()))
        );
    }

    #[test]
    fn keyword_text_is_kept_raw() {
        let command: Command = "keyword   rust  ".parse().unwrap();
        assert_eq!(command, Command::KeywordEnter("rust  ".to_owned()));
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(matches!(
            "set nope value".parse::<Command>(),
            Err(CommandParseError::UnknownInput(_))
        ));
        assert_eq!(
            "fly".parse::<Command>(),
            Err(CommandParseError::Unknown("fly".to_owned()))
        );
        assert_eq!("   ".parse::<Command>(), Err(CommandParseError::Empty));
    }
}
