use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::time::{Duration, Instant};

use report_composer::clipboard::{ClipboardError, ClipboardSink, COPIED_LABEL, COPY_LABEL};
use report_composer::composer::{
    CONNECTION_ALERT, EMPTY_PREVIEW_ALERT, MISSING_TITLE_ALERT, SUBMIT_SUCCESS_ALERT,
};
use report_composer::config::ComposerConfig;
use report_composer::fonts;
use report_composer::form::{Field, RevisionField};
use report_composer::submit::{SubmissionClient, SubmitError, Submitter};
use report_composer::{Command, Composer, KeywordSet, Notice, ReportDocument};
use tempfile::TempDir;

#[derive(Clone, Copy)]
enum Reply {
    Accept,
    Reject(&'static str),
}

#[derive(Clone)]
struct RecordingSubmitter {
    reply: Reply,
    received: Rc<RefCell<Vec<ReportDocument>>>,
}

impl Submitter for RecordingSubmitter {
    fn submit(&self, document: &ReportDocument) -> Result<(), SubmitError> {
        self.received.borrow_mut().push(document.clone());
        match self.reply {
            Reply::Accept => Ok(()),
            Reply::Reject(message) => Err(SubmitError::Rejected {
                status: 409,
                message: message.to_owned(),
            }),
        }
    }
}

#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<Option<String>>>);

impl ClipboardSink for SharedClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.0.borrow_mut() = Some(text.to_owned());
        Ok(())
    }
}

struct Harness {
    composer: Composer,
    received: Rc<RefCell<Vec<ReportDocument>>>,
    clipboard: SharedClipboard,
    output: TempDir,
}

fn harness(reply: Reply) -> Harness {
    let output = tempfile::tempdir().expect("temp dir");
    let config = ComposerConfig {
        output_dir: output.path().to_path_buf(),
        copy_feedback_ms: 2_000,
        ..ComposerConfig::default()
    };
    let received = Rc::new(RefCell::new(Vec::new()));
    let clipboard = SharedClipboard::default();
    let composer = Composer::new(
        &config,
        Box::new(RecordingSubmitter {
            reply,
            received: Rc::clone(&received),
        }),
        Box::new(clipboard.clone()),
    );
    Harness {
        composer,
        received,
        clipboard,
        output,
    }
}

fn keywords(values: &[&str]) -> KeywordSet {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .into()
}

fn set(composer: &mut Composer, field: Field, value: &str) {
    assert!(composer
        .dispatch(Command::SetField(field, value.to_owned()))
        .is_empty());
}

fn fill_basic_form(composer: &mut Composer) {
    set(composer, Field::Title, "Annual Report");
    set(composer, Field::Kind, "Relatório");
    set(composer, Field::Year, "2024");
    set(composer, Field::Status, "Final");
    set(composer, Field::SubmittedAt, "2024-05-01T10:30");
    set(composer, Field::ResponsibleName, "Ana");
}

#[test]
fn keywords_are_added_once_and_removed_on_click() {
    let mut h = harness(Reply::Accept);

    let notices = h.composer.dispatch(Command::KeywordEnter("  rust ".into()));
    assert_eq!(
        notices,
        vec![
            Notice::KeywordInputCleared,
            Notice::KeywordsRendered(keywords(&["rust"])),
        ]
    );

    assert!(h
        .composer
        .dispatch(Command::KeywordEnter("rust".into()))
        .is_empty());
    assert!(h
        .composer
        .dispatch(Command::KeywordEnter("   ".into()))
        .is_empty());

    h.composer.dispatch(Command::KeywordEnter("pdf".into()));
    let notices = h.composer.dispatch(Command::RemoveKeyword("rust".into()));
    assert_eq!(notices, vec![Notice::KeywordsRendered(keywords(&["pdf"]))]);
    assert_eq!(h.composer.form().keywords().as_slice(), ["pdf"]);
}

#[test]
fn submit_previews_and_sends_plain_document() {
    let mut h = harness(Reply::Accept);
    fill_basic_form(&mut h.composer);
    h.composer.dispatch(Command::KeywordEnter("rust".into()));

    let notices = h.composer.dispatch(Command::Submit);
    assert_eq!(notices.len(), 2);
    let Notice::PreviewUpdated(preview) = &notices[0] else {
        panic!("expected a preview notice, got {:?}", notices[0]);
    };
    assert!(preview.contains(r#""$date": "2024-05-01T10:30""#));
    assert_eq!(notices[1], Notice::Alert(SUBMIT_SUCCESS_ALERT.into()));
    assert_eq!(h.composer.preview(), preview);

    let received = h.received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].submitted_at, "2024-05-01T10:30");
    assert_eq!(received[0].year, Some(2024));
    assert_eq!(received[0].keywords.as_slice(), ["rust"]);
}

#[test]
fn rejection_surfaces_server_message() {
    let mut h = harness(Reply::Reject("duplicate"));
    fill_basic_form(&mut h.composer);

    let notices = h.composer.dispatch(Command::Submit);
    assert_eq!(
        notices.last(),
        Some(&Notice::Alert("Erro ao enviar documento: duplicate".into()))
    );
}

#[test]
fn unreachable_service_reports_connection_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let output = tempfile::tempdir().expect("temp dir");
    let config = ComposerConfig {
        output_dir: output.path().to_path_buf(),
        ..ComposerConfig::default()
    };
    let mut composer = Composer::new(
        &config,
        Box::new(
            SubmissionClient::new(format!("http://127.0.0.1:{}/documentos", port))
                .expect("http client"),
        ),
        Box::new(SharedClipboard::default()),
    );
    fill_basic_form(&mut composer);

    let notices = composer.dispatch(Command::Submit);
    assert!(matches!(notices[0], Notice::PreviewUpdated(_)));
    assert_eq!(notices.last(), Some(&Notice::Alert(CONNECTION_ALERT.into())));
}

#[test]
fn incomplete_revision_blocks_submission() {
    let mut h = harness(Reply::Accept);
    fill_basic_form(&mut h.composer);

    assert_eq!(
        h.composer.dispatch(Command::AddRevision),
        vec![Notice::RevisionAdded(1)]
    );
    h.composer.dispatch(Command::SetRevisionField {
        index: 0,
        field: RevisionField::Reviewer,
        value: "Bruno".into(),
    });

    let notices = h.composer.dispatch(Command::Submit);
    assert_eq!(
        notices,
        vec![Notice::Alert(
            "Preencha todos os campos da revisão 1.".into()
        )]
    );
    assert!(h.received.borrow().is_empty());
    assert!(h.composer.preview().is_empty());
}

#[test]
fn completed_revisions_are_sent_in_order() {
    let mut h = harness(Reply::Accept);
    fill_basic_form(&mut h.composer);

    for (index, reviewer) in ["Bruno", "Carla"].iter().enumerate() {
        h.composer.dispatch(Command::AddRevision);
        for (field, value) in [
            (RevisionField::Timestamp, "2024-06-01T08:00"),
            (RevisionField::Reviewer, *reviewer),
            (RevisionField::Comment, "ok"),
        ] {
            h.composer.dispatch(Command::SetRevisionField {
                index,
                field,
                value: value.into(),
            });
        }
    }

    let notices = h.composer.dispatch(Command::Submit);
    assert_eq!(notices.last(), Some(&Notice::Alert(SUBMIT_SUCCESS_ALERT.into())));
    let received = h.received.borrow();
    let reviewers: Vec<_> = received[0]
        .revisions
        .iter()
        .map(|revision| revision.reviewer.as_str())
        .collect();
    assert_eq!(reviewers, ["Bruno", "Carla"]);
}

#[test]
fn unknown_revision_number_is_reported() {
    let mut h = harness(Reply::Accept);
    let notices = h.composer.dispatch(Command::SetRevisionField {
        index: 3,
        field: RevisionField::Comment,
        value: "x".into(),
    });
    assert_eq!(notices, vec![Notice::Alert("Revisão 4 não existe.".into())]);
}

#[test]
fn pdf_requires_a_title() {
    let mut h = harness(Reply::Accept);
    set(&mut h.composer, Field::Kind, "Relatório");

    let notices = h.composer.dispatch(Command::GeneratePdf);
    assert_eq!(notices, vec![Notice::Alert(MISSING_TITLE_ALERT.into())]);
    let written = std::fs::read_dir(h.output.path()).expect("read dir").count();
    assert_eq!(written, 0);
}

#[test]
fn pdf_is_saved_under_title_file_name() {
    if !fonts::default_fonts_available() {
        return;
    }

    let mut h = harness(Reply::Accept);
    fill_basic_form(&mut h.composer);

    let notices = h.composer.dispatch(Command::GeneratePdf);
    let expected = h.output.path().join("Annual_Report.pdf");
    assert_eq!(notices, vec![Notice::PdfSaved(expected.clone())]);
    let bytes = std::fs::read(expected).expect("pdf written");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn copy_needs_a_preview_first() {
    let mut h = harness(Reply::Accept);
    let notices = h.composer.dispatch(Command::CopyJson);
    assert_eq!(notices, vec![Notice::Alert(EMPTY_PREVIEW_ALERT.into())]);
    assert!(h.clipboard.0.borrow().is_none());
}

#[test]
fn copy_places_preview_on_clipboard_and_swaps_label() {
    let mut h = harness(Reply::Accept);
    fill_basic_form(&mut h.composer);
    h.composer.dispatch(Command::Submit);

    let now = Instant::now();
    assert_eq!(h.composer.copy_label(now), COPY_LABEL);
    let notices = h.composer.copy_json(now);
    assert_eq!(notices, vec![Notice::Copied(COPIED_LABEL)]);
    assert_eq!(
        h.clipboard.0.borrow().as_deref(),
        Some(h.composer.preview())
    );

    assert_eq!(
        h.composer.copy_label(now + Duration::from_millis(1_999)),
        COPIED_LABEL
    );
    assert_eq!(h.composer.copy_label(now + Duration::from_secs(2)), COPY_LABEL);
}

#[test]
fn reset_clears_form_and_keywords() {
    let mut h = harness(Reply::Accept);
    fill_basic_form(&mut h.composer);
    h.composer.dispatch(Command::KeywordEnter("rust".into()));
    h.composer.dispatch(Command::AddRevision);

    let notices = h.composer.dispatch(Command::Reset);
    assert_eq!(
        notices,
        vec![Notice::FormReset, Notice::KeywordsRendered(KeywordSet::new())]
    );
    assert_eq!(h.composer.form().field(Field::Title), "");
    assert!(h.composer.form().revision_blocks().is_empty());
}

#[test]
fn session_lines_drive_the_composer() {
    let mut h = harness(Reply::Accept);
    for line in [
        "set titulo Annual Report",
        "set data_envio 2024-05-01T10:30",
        "keyword rust",
        "add-revision",
        "revision 1 data 2024-06-01T08:00",
        "revision 1 revisado_por Bruno",
        "revision 1 comentario Aprovado",
    ] {
        let command: Command = line.parse().expect("valid line");
        h.composer.dispatch(command);
    }

    let document = h.composer.build_document();
    assert_eq!(document.title, "Annual Report");
    assert_eq!(document.keywords.as_slice(), ["rust"]);
    assert_eq!(document.revisions.len(), 1);
    assert_eq!(document.revisions[0].comment, "Aprovado");
}

#[test]
fn demo_snapshot_builds_a_complete_document() {
    let form: report_composer::FormState =
        serde_json::from_str(include_str!("../demos/annual_report.json")).expect("demo form");
    let document = form.build_document();
    assert_eq!(document.title, "Annual Report");
    assert_eq!(document.year, Some(2024));
    assert_eq!(document.responsible.department, "TI");
    assert_eq!(document.keywords.as_slice(), ["rust", "pdf"]);
    assert_eq!(document.revisions[0].reviewer, "Bruno Lima");
}
