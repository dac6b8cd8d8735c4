//! The gate in front of every index action, built bottom-up:
//! repository name (or pages branch), then author (owner or organization
//! admin), then fork, then for single pages the link's domain.

use pagewarden_github::Command;
use pagewarden_language::{Language, ResponseKey};
use pagewarden_steps::{Check, LogsLocation, StepGraph, StepGraphBuilder, StepGraphError, StepId};

use crate::brain::DENIAL_NOTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexKind {
    Site,
    Page,
}

pub(crate) fn index_name(command: &Command) -> String {
    format!("{}x{}", command.author_login(), command.repo().name()).to_lowercase()
}

pub(crate) fn build_index_graph(
    command: &Command,
    language: &dyn Language,
    logs: &LogsLocation,
    kind: IndexKind,
) -> Result<StepGraph, StepGraphError> {
    let author = command.author_login();
    let mut builder = StepGraphBuilder::new();

    let done = builder.final_step(None)?;
    let finished = builder.reply(
        language.render(
            ResponseKey::IndexFinished,
            &[author, command.repo().name(), logs.address()],
        ),
        done,
    )?;
    let follow_up = builder.star_repo(finished)?;

    let index = match kind {
        IndexKind::Site => builder.index_site(
            format!("https://{}", command.repo().pages_domain()),
            index_name(command),
            follow_up,
        )?,
        IndexKind::Page => builder.index_page(index_name(command), follow_up)?,
    };
    let start = builder.reply(
        language.render(ResponseKey::IndexStart, &[author, logs.address()]),
        index,
    )?;

    let tail = match kind {
        IndexKind::Site => start,
        IndexKind::Page => {
            let bad_link = deny(&mut builder, command, language, ResponseKey::DeniedBadLink)?;
            builder.check(Check::PageHostedOnGithub, start, bad_link)?
        }
    };

    let fork_denied = deny(&mut builder, command, language, ResponseKey::DeniedFork)?;
    let fork = builder.check(Check::RepoFork, fork_denied, tail)?;

    let commander_denied = deny(&mut builder, command, language, ResponseKey::DeniedCommander)?;
    let org_admin = builder.check(Check::OrganizationAdmin, fork, commander_denied)?;
    let author_owner = builder.check(Check::AuthorOwner, fork, org_admin)?;

    let name_denied = deny(&mut builder, command, language, ResponseKey::DeniedName)?;
    let gh_pages = builder.check(Check::GhPagesBranch, author_owner, name_denied)?;
    let repo_name = builder.check(Check::RepoName, author_owner, gh_pages)?;

    builder.build(repo_name)
}

fn deny(
    builder: &mut StepGraphBuilder,
    command: &Command,
    language: &dyn Language,
    key: ResponseKey,
) -> Result<StepId, StepGraphError> {
    let done = builder.final_step(Some(DENIAL_NOTE))?;
    builder.reply(language.render(key, &[command.author_login()]), done)
}

#[cfg(test)]
mod tests {
    use pagewarden_language::{Language, PatternLanguage, ResponseKey};
    use pagewarden_steps::test_support::{
        command_on, org_repo, user_repo, Harness, IndexCall, TEST_LOGS_ADDRESS,
    };
    use pagewarden_steps::{Check, LogsLocation, StepNode};

    use super::{build_index_graph, index_name, IndexKind};
    use crate::brain::DENIAL_NOTE;

    fn english() -> PatternLanguage {
        PatternLanguage::english().expect("english")
    }

    #[test]
    fn unit_index_name_is_lowercase_author_x_repo() {
        let command = command_on("Alice", "index site", user_repo("alice", "Blog", false, true));
        assert_eq!(index_name(&command), "alicexblog");
    }

    #[test]
    fn unit_site_graph_checks_in_fixed_order() {
        let command = command_on(
            "alice",
            "index this site",
            user_repo("alice", "alice.github.io", false, false),
        );
        let graph = build_index_graph(
            &command,
            &english(),
            &LogsLocation::new(TEST_LOGS_ADDRESS),
            IndexKind::Site,
        )
        .expect("graph");
        let kinds = graph
            .true_path()
            .into_iter()
            .map(|node| match node {
                StepNode::Check { check, .. } => check.as_str().to_string(),
                other => other.kind().to_string(),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec!["repo_name", "author_owner", "repo_fork", "reply", "final"]
        );
        assert!(matches!(
            graph.root_node(),
            StepNode::Check {
                check: Check::RepoName,
                ..
            }
        ));
    }

    #[test]
    fn functional_page_graph_has_one_final_per_outcome() {
        let command = command_on(
            "alice",
            "index this page (https://alice.github.io/a.html)",
            user_repo("alice", "alice.github.io", false, false),
        );
        let graph = build_index_graph(
            &command,
            &english(),
            &LogsLocation::new(TEST_LOGS_ADDRESS),
            IndexKind::Page,
        )
        .expect("graph");
        let finals = graph
            .nodes()
            .iter()
            .filter(|node| matches!(node, StepNode::Final { .. }))
            .count();
        // success, bad link, fork, commander, name
        assert_eq!(finals, 5);
    }

    #[test]
    fn integration_site_owner_path_indexes_stars_and_reports() {
        let harness = Harness::default();
        let command = command_on(
            "alice",
            "index this site",
            user_repo("alice", "alice.github.io", false, false),
        );
        let graph = build_index_graph(&command, &english(), &harness.logs, IndexKind::Site)
            .expect("graph");
        let trace = graph.perform(&command, &harness.context()).expect("run");
        assert_eq!(
            trace.labels(),
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
            harness.indexer.calls(),
            vec![IndexCall::Site {
                repo: command.repo().repo_ref(),
                site_url: "https://alice.github.io".to_string(),
                index_name: "alicexalice.github.io".to_string(),
            }]
        );
        let english = english();
        assert_eq!(
            harness.platform.comments(),
            vec![
                english.render(ResponseKey::IndexStart, &["alice", TEST_LOGS_ADDRESS]),
                english.render(
                    ResponseKey::IndexFinished,
                    &["alice", "alice.github.io", TEST_LOGS_ADDRESS]
                ),
            ]
        );
    }

    #[test]
    fn integration_org_admin_passes_authorization_gate() {
        let harness = Harness::default().with_org_admin("acme", "bob");
        let command = command_on("bob", "index this site", org_repo("acme", "docs", false, true));
        let graph = build_index_graph(&command, &english(), &harness.logs, IndexKind::Site)
            .expect("graph");
        let trace = graph.perform(&command, &harness.context()).expect("run");
        assert_eq!(
            &trace.labels()[..5],
            &[
                "repo_name=false",
                "gh_pages_branch=true",
                "author_owner=false",
                "organization_admin=true",
                "repo_fork=false"
            ]
        );
        assert!(trace.indexed());
        assert_eq!(
            harness.indexer.calls(),
            vec![IndexCall::Site {
                repo: command.repo().repo_ref(),
                site_url: "https://acme.github.io/docs".to_string(),
                index_name: "bobxdocs".to_string(),
            }]
        );
    }

    #[test]
    fn regression_name_denial_uses_name_template() {
        let harness = Harness::default();
        let command = command_on("alice", "index this site", user_repo("alice", "notes", false, false));
        let graph = build_index_graph(&command, &english(), &harness.logs, IndexKind::Site)
            .expect("graph");
        let trace = graph.perform(&command, &harness.context()).expect("run");
        assert_eq!(
            trace.labels(),
            vec!["repo_name=false", "gh_pages_branch=false", "reply", "final"]
        );
        assert_eq!(
            trace.replies(),
            vec![english().render(ResponseKey::DeniedName, &["alice"]).as_str()]
        );
        assert_eq!(trace.final_note(), Some(DENIAL_NOTE));
    }

    #[test]
    fn regression_forks_are_denied_for_site_and_page() {
        let english = english();
        let denial = english.render(ResponseKey::DeniedFork, &["alice"]);
        for (kind, body) in [
            (IndexKind::Site, "index this site"),
            (IndexKind::Page, "index this page (https://alice.github.io/a.html)"),
        ] {
            let harness = Harness::default();
            let command = command_on("alice", body, user_repo("alice", "alice.github.io", true, false));
            let graph =
                build_index_graph(&command, &english, &harness.logs, kind).expect("graph");
            let trace = graph.perform(&command, &harness.context()).expect("run");
            assert_eq!(trace.replies(), vec![denial.as_str()]);
            assert!(!trace.indexed());
            assert!(harness.indexer.calls().is_empty());
        }
    }
}
