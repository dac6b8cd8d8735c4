use std::sync::Arc;

use pagewarden_brain::{Brain, DENIAL_NOTE, FALLBACK_NOTE};
use pagewarden_github::{Command, IssueCommentEvent};
use pagewarden_language::{parse_languages, Intent, Language, Languages, PatternLanguage, ResponseKey};
use pagewarden_steps::test_support::{
    command_on, org_repo, user_repo, Harness, IndexCall, PlatformCall, TEST_LOGS_ADDRESS,
};
use pagewarden_steps::{LogsLocation, StepsOutcome, StepsState};
use serde_json::json;

fn english() -> PatternLanguage {
    PatternLanguage::english().expect("english")
}

fn english_brain() -> Brain {
    Brain::new(Languages::new(vec![Arc::new(english()) as Arc<dyn Language>]).expect("languages"))
}

#[test]
fn functional_hello_replies_with_author_login() {
    let brain = english_brain();
    let harness = Harness::default();
    let command = command_on(
        "carol",
        "@pagewarden hello",
        user_repo("alice", "blog", false, false),
    );

    let outcome = brain.handle(&command, &harness.context()).expect("outcome");
    assert_eq!(outcome.state(), StepsState::Completed);
    assert_eq!(
        harness.platform.comments(),
        vec![english().render(ResponseKey::Hello, &["carol"])]
    );
    assert_eq!(outcome.primary_trace().labels(), vec!["reply", "final"]);
}

#[test]
fn integration_owner_indexes_user_site_end_to_end() {
    let brain = english_brain();
    let repo = user_repo("alice", "alice.github.io", false, false);
    let harness = Harness::default().with_repository(repo);
    let event = IssueCommentEvent::from_payload(&json!({
        "action": "created",
        "comment": { "id": 1, "body": "index this site", "user": { "login": "alice" } },
        "issue": { "number": 9 },
        "repository": { "name": "alice.github.io", "owner": { "login": "alice", "type": "User" } }
    }))
    .expect("event");
    let command = Command::load(&harness.platform, &event).expect("command");

    let outcome = brain.handle(&command, &harness.context()).expect("outcome");
    assert!(outcome.is_completed());
    assert_eq!(
        outcome.primary_trace().labels(),
        vec![
            "repo_name=true",
            "author_owner=true",
            "repo_fork=false",
            "reply",
            "index_site",
            "star_repo",
            "reply",
            "final"
        ]
    );
    assert_eq!(
        harness.platform.stars(),
        vec![command.issue().repo.clone()]
    );
    let english = english();
    assert_eq!(
        harness.platform.comments().last().cloned(),
        Some(english.render(
            ResponseKey::IndexFinished,
            &["alice", "alice.github.io", TEST_LOGS_ADDRESS]
        ))
    );
    // snapshot fetched once, then only mutations
    let calls = harness.platform.calls();
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(
                call,
                PlatformCall::Repository { .. } | PlatformCall::Branch { .. }
            ))
            .count(),
        2
    );
}

#[test]
fn functional_non_owner_non_admin_is_denied_without_indexing() {
    let brain = english_brain();
    let harness = Harness::default().with_org_admin("acme", "dave");
    for repo in [
        user_repo("alice", "alice.github.io", false, false),
        org_repo("acme", "acme.github.io", false, false),
    ] {
        let command = command_on("mallory", "index this site", repo);
        let outcome = brain.handle(&command, &harness.context()).expect("outcome");
        assert!(outcome.is_completed());
        assert_eq!(
            outcome.primary_trace().replies(),
            vec![english()
                .render(ResponseKey::DeniedCommander, &["mallory"])
                .as_str()]
        );
        assert_eq!(outcome.primary_trace().final_note(), Some(DENIAL_NOTE));
    }
    assert!(harness.indexer.calls().is_empty());
    assert!(harness.platform.stars().is_empty());
}

#[test]
fn regression_foreign_page_link_is_denied_as_bad_link() {
    let brain = english_brain();
    let harness = Harness::default();
    let command = command_on(
        "alice",
        "index this page (http://evil.example.com/page)",
        user_repo("alice", "blog", false, true),
    );

    let outcome = brain.handle(&command, &harness.context()).expect("outcome");
    assert_eq!(
        outcome.primary_trace().labels(),
        vec![
            "repo_name=false",
            "gh_pages_branch=true",
            "author_owner=true",
            "repo_fork=false",
            "page_hosted_on_github=false",
            "reply",
            "final"
        ]
    );
    assert_eq!(
        harness.platform.comments(),
        vec![english().render(ResponseKey::DeniedBadLink, &["alice"])]
    );
    assert!(harness.indexer.calls().is_empty());
}

#[test]
fn integration_project_page_on_pages_domain_is_indexed() {
    let brain = english_brain();
    let harness = Harness::default();
    let command = command_on(
        "alice",
        "@pagewarden index this page (https://alice.github.io/blog/2024/post.html)",
        user_repo("alice", "blog", false, true),
    );

    let outcome = brain.handle(&command, &harness.context()).expect("outcome");
    assert!(outcome.is_completed());
    assert_eq!(
        harness.indexer.calls(),
        vec![IndexCall::Page {
            page_url: "https://alice.github.io/blog/2024/post.html".to_string(),
            index_name: "alicexblog".to_string(),
        }]
    );
    assert_eq!(harness.platform.stars().len(), 1);
}

#[test]
fn regression_forks_are_never_indexed_even_for_admins() {
    let brain = english_brain();
    let harness = Harness::default().with_org_admin("acme", "dave");
    let denial = english().render(ResponseKey::DeniedFork, &["dave"]);
    for body in [
        "index this site",
        "index this page (https://acme.github.io/docs/a.html)",
    ] {
        let command = command_on("dave", body, org_repo("acme", "docs", true, true));
        let outcome = brain.handle(&command, &harness.context()).expect("outcome");
        assert_eq!(outcome.primary_trace().replies(), vec![denial.as_str()]);
    }
    assert!(harness.indexer.calls().is_empty());
}

#[test]
fn integration_indexing_failure_posts_failure_notice_once() {
    let brain = english_brain();
    let harness = Harness::default().failing_indexer();
    let command = command_on(
        "alice",
        "index this site",
        user_repo("alice", "alice.github.io", false, false),
    );

    let outcome = brain.handle(&command, &harness.context()).expect("outcome");
    match &outcome {
        StepsOutcome::FallbackCompleted {
            fallback_trace,
            fallback_error,
            ..
        } => {
            assert_eq!(fallback_trace.final_note(), Some(FALLBACK_NOTE));
            assert!(fallback_error.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let english = english();
    assert_eq!(
        harness.platform.comments(),
        vec![
            english.render(ResponseKey::IndexStart, &["alice", TEST_LOGS_ADDRESS]),
            english.render(ResponseKey::StepFailure, &["alice", TEST_LOGS_ADDRESS]),
        ]
    );
    assert!(harness.platform.stars().is_empty());
}

#[test]
fn functional_graph_assembly_is_idempotent() {
    let brain = english_brain();
    let logs = LogsLocation::new(TEST_LOGS_ADDRESS);
    let command = command_on(
        "alice",
        "index this page (https://alice.github.io/a.html)",
        user_repo("alice", "alice.github.io", false, false),
    );
    let first = brain.understand(&command, &logs).expect("first");
    let second = brain.understand(&command, &logs).expect("second");
    assert_eq!(first, second);
}

#[test]
fn functional_unmatched_comment_answers_in_first_configured_language() {
    let languages = parse_languages(
        r#"
[[languages]]
name = "romanian"
[[languages.rules]]
intent = "hello"
patterns = ["\\bsalut\\b"]
[languages.responses]
"unknown.comment" = "@{0} nu inteleg."

[[languages]]
name = "english"
[[languages.rules]]
intent = "hello"
patterns = ["\\bhello\\b"]
"#,
        "inline",
    )
    .expect("languages");
    let brain = Brain::new(languages);
    let harness = Harness::default();
    let repo = user_repo("alice", "blog", false, false);

    let unknown = command_on("alice", "ce faci?", repo.clone());
    let category = brain.languages().categorize(&unknown);
    assert_eq!(category.intent(), Intent::Unknown);
    assert_eq!(category.language().name(), "romanian");
    brain.handle(&unknown, &harness.context()).expect("outcome");

    let hello = command_on("alice", "hello", repo);
    let category = brain.languages().categorize(&hello);
    assert_eq!(category.language().name(), "english");

    assert_eq!(harness.platform.comments(), vec!["@alice nu inteleg.".to_string()]);
}
