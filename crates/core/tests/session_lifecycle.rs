//! End-to-end session lifecycle: allocation, waiting, settlement, cleanup.

use std::collections::HashSet;
use std::time::Duration;

use redpen::{ReviewOutcome, SessionBroker, SessionRequest};
use redpen_protocol::{APPROVAL_MARKER, SubmitAck};
use serde_json::json;

fn request(document: &str, root: &std::path::Path) -> SessionRequest {
	SessionRequest::new(document, root).with_browser(false)
}

#[tokio::test]
async fn submitted_feedback_reaches_the_waiter_unchanged() {
	let dir = tempfile::tempdir().unwrap();
	let broker = SessionBroker::new();
	let mut handle = broker.create(request("# Title", dir.path())).await.unwrap();

	let url = format!("http://127.0.0.1:{}/api/submit", handle.session().port());
	let submit = tokio::spawn(async move {
		let body = json!({
			"comments": [{
				"id": "c-1",
				"quote": "foo",
				"context_line": "line with foo in it",
				"note": "bar",
				"created_at": 1_700_000_000u64,
			}],
			"user_overall_comment": null,
		});
		let response = reqwest::Client::new().post(url).json(&body).send().await.unwrap();
		assert_eq!(response.status(), 200);
		response.json::<SubmitAck>().await.unwrap()
	});

	let outcome = handle.wait(None).await;
	let ReviewOutcome::Submitted(feedback) = outcome else {
		panic!("expected Submitted, got {outcome:?}");
	};
	assert_eq!(feedback.comments.len(), 1);
	assert_eq!(feedback.comments[0].quote, "foo");
	assert_eq!(feedback.comments[0].note, "bar");
	assert_eq!(feedback.overall_comment, None);

	assert_eq!(submit.await.unwrap().status, "ok");
	handle.close().await;
	assert!(broker.registry().is_empty());
}

#[tokio::test]
async fn empty_submission_settles_with_explicit_approval_marker() {
	let dir = tempfile::tempdir().unwrap();
	let broker = SessionBroker::new();
	let mut handle = broker.create(request("# Title", dir.path())).await.unwrap();

	let url = format!("http://127.0.0.1:{}/api/submit", handle.session().port());
	tokio::spawn(async move {
		let body = json!({ "comments": [], "user_overall_comment": null });
		reqwest::Client::new().post(url).json(&body).send().await.unwrap()
	});

	let outcome = handle.wait(None).await;
	let ReviewOutcome::Submitted(feedback) = outcome else {
		panic!("expected Submitted, got {outcome:?}");
	};
	assert!(feedback.comments.is_empty());
	assert_eq!(feedback.overall_comment.as_deref(), Some(APPROVAL_MARKER));

	handle.close().await;
}

#[tokio::test]
async fn concurrent_sessions_hold_distinct_ports() {
	let dir = tempfile::tempdir().unwrap();
	let broker = SessionBroker::new();

	let mut handles = Vec::new();
	for i in 0..5 {
		let handle = broker
			.create(request(&format!("# Doc {i}"), dir.path()))
			.await
			.unwrap();
		handles.push(handle);
	}

	let ports: HashSet<u16> = handles.iter().map(|h| h.session().port()).collect();
	assert_eq!(ports.len(), 5, "every live session gets its own port");
	assert_eq!(broker.registry().len(), 5);

	for handle in handles {
		handle.close().await;
	}
	assert!(broker.registry().is_empty());
}

#[tokio::test]
async fn dropping_the_handle_cancels_and_releases_the_port() {
	let dir = tempfile::tempdir().unwrap();
	let broker = SessionBroker::new();
	let handle = broker.create(request("# Doc", dir.path())).await.unwrap();

	let port = handle.session().port();
	let session = std::sync::Arc::clone(handle.session());
	assert!(broker.registry().contains(port));

	drop(handle);

	assert!(!broker.registry().contains(port), "port released on drop");
	assert!(session.is_settled(), "promise settled on drop");

	// The listener socket goes away with the aborted server task.
	tokio::time::sleep(Duration::from_millis(100)).await;
	let result = reqwest::Client::new()
		.get(format!("http://127.0.0.1:{port}/api/content"))
		.timeout(Duration::from_millis(500))
		.send()
		.await;
	assert!(result.is_err(), "gateway still reachable after drop");
}

#[tokio::test]
async fn wait_deadline_settles_as_timed_out() {
	let dir = tempfile::tempdir().unwrap();
	let broker = SessionBroker::new();
	let mut handle = broker.create(request("# Doc", dir.path())).await.unwrap();

	let outcome = handle.wait(Some(Duration::from_millis(50))).await;
	assert!(matches!(outcome, ReviewOutcome::TimedOut), "got {outcome:?}");
	assert!(handle.session().is_settled());

	handle.close().await;
	assert!(broker.registry().is_empty());
}

#[tokio::test]
async fn submission_racing_the_deadline_is_never_lost() {
	let dir = tempfile::tempdir().unwrap();
	let broker = SessionBroker::new();
	let mut handle = broker.create(request("# Doc", dir.path())).await.unwrap();

	// Settle by hand before waiting with an immediate deadline; the wait
	// must report the submission, not the timeout.
	use redpen::ReviewOutcome::Submitted;
	let feedback = redpen_protocol::ReviewSubmission::default().into_feedback();
	assert!(handle.session().resolve(Submitted(feedback)));

	let outcome = handle.wait(Some(Duration::from_millis(1))).await;
	assert!(matches!(outcome, ReviewOutcome::Submitted(_)), "got {outcome:?}");

	handle.close().await;
}

#[tokio::test]
async fn independent_brokers_do_not_share_registries() {
	let dir = tempfile::tempdir().unwrap();
	let broker_a = SessionBroker::new();
	let broker_b = SessionBroker::new();

	let handle_a = broker_a.create(request("# A", dir.path())).await.unwrap();
	assert_eq!(broker_a.registry().len(), 1);
	assert!(broker_b.registry().is_empty());

	handle_a.close().await;
}
