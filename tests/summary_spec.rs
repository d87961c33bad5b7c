//! Summary dialog lifecycle tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ScriptedGenerator;
use quicknotes::models::{SummaryStatus, SUMMARY_FAILED_MESSAGE};
use quicknotes::summary::{KeywordSummarizer, SummaryRequester};

const HELLO_SUMMARY: &str = "A note containing 1 words discussing various topics and ideas.";

mod request_summary {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn goes_from_pending_to_succeeded() {
        let generator = ScriptedGenerator::new().respond(
            "hello",
            Duration::from_millis(1500),
            Ok(HELLO_SUMMARY),
        );
        let requester = SummaryRequester::new(generator);

        let ticket = requester.request_summary("hello");

        let dialog = requester.dialog().expect("dialog should be open");
        assert!(dialog.is_pending());
        assert_eq!(dialog.source_content, "hello");

        ticket.settled().await;

        let dialog = requester.dialog().expect("dialog should stay open");
        assert_eq!(
            dialog.status,
            SummaryStatus::Succeeded {
                summary: HELLO_SUMMARY.to_string()
            }
        );
        assert_eq!(dialog.summary(), Some(HELLO_SUMMARY));
    }

    #[tokio::test(start_paused = true)]
    async fn any_rejection_shows_the_fixed_message() {
        let generator = ScriptedGenerator::new().respond(
            "some text",
            Duration::from_millis(10),
            Err("model overloaded: 529"),
        );
        let requester = SummaryRequester::new(generator);

        requester.request_summary("some text").settled().await;

        let dialog = requester.dialog().unwrap();
        assert_eq!(
            dialog.status,
            SummaryStatus::Failed {
                message: SUMMARY_FAILED_MESSAGE.to_string()
            }
        );
        assert_eq!(dialog.summary(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn passes_content_verbatim() {
        let content = "  Shopping list\n- eggs  ";
        let generator =
            Arc::new(ScriptedGenerator::new().respond(content, Duration::ZERO, Ok("ok")));
        let requester = SummaryRequester::with_shared(Arc::clone(&generator));

        requester.request_summary(content).settled().await;

        assert_eq!(generator.seen(), vec![content]);
        assert_eq!(requester.dialog().unwrap().source_content, content);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_request_supersedes_pending_one() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .respond("one", Duration::from_millis(500), Ok("first"))
                .respond("two", Duration::from_millis(100), Ok("second")),
        );
        let requester = SummaryRequester::with_shared(Arc::clone(&generator));

        let first = requester.request_summary("one");
        let second = requester.request_summary("two");
        assert!(second.token() > first.token());

        second.settled().await;
        first.settled().await;
        tokio::time::sleep(Duration::from_millis(600)).await;

        let dialog = requester.dialog().unwrap();
        assert_eq!(dialog.source_content, "two");
        assert_eq!(dialog.summary(), Some("second"));
        // The first request was cancelled before it reached the generator.
        assert_eq!(generator.seen(), vec!["two"]);
    }

    #[tokio::test(start_paused = true)]
    async fn works_with_the_keyword_summarizer() {
        let requester = SummaryRequester::new(KeywordSummarizer::new(
            Duration::from_millis(1000),
            Duration::from_millis(2000),
        ));

        let started = tokio::time::Instant::now();
        requester.request_summary("one two three").settled().await;

        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(
            requester.dialog().unwrap().summary(),
            Some("A note containing 3 words discussing various topics and ideas.")
        );
    }
}

mod close_dialog {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn resets_to_idle() {
        let generator = ScriptedGenerator::new().respond("text", Duration::ZERO, Ok("done"));
        let requester = SummaryRequester::new(generator);
        requester.request_summary("text").settled().await;

        requester.close_dialog();

        assert!(requester.dialog().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn late_result_is_ignored() {
        let generator =
            ScriptedGenerator::new().respond("text", Duration::from_millis(1000), Ok("too late"));
        let requester = SummaryRequester::new(generator);

        let ticket = requester.request_summary("text");
        requester.close_dialog();
        ticket.settled().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(requester.dialog().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_request_after_close_starts_fresh() {
        let generator = ScriptedGenerator::new()
            .respond("a", Duration::from_millis(1000), Ok("stale"))
            .respond("b", Duration::from_millis(10), Ok("fresh"));
        let requester = SummaryRequester::new(generator);

        let stale = requester.request_summary("a");
        requester.close_dialog();
        let fresh = requester.request_summary("b");

        fresh.settled().await;
        stale.settled().await;

        let dialog = requester.dialog().unwrap();
        assert_eq!(dialog.source_content, "b");
        assert_eq!(dialog.summary(), Some("fresh"));
    }
}
