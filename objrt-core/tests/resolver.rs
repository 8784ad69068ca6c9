//! Path resolution against a scripted cluster.

mod support;

use std::sync::Arc;

use objrt_contracts::prelude::*;
use objrt_core::cluster::{ClusterQuery, ScriptedAdapter};
use objrt_core::{ErrorKind, PathResolver, RootBinding, RootBindings};
use objrt_model::{
    Badge, Endpoint, JobState, ObjectKind, RuntimeNode, SchedulerHost,
};

use support::{ROOT, SCHEDULER_HOST, alpha_beta_cluster, resolver};

#[tokio::test]
async fn root_children_follow_the_path_invariant() {
    let node = resolver(alpha_beta_cluster())
        .resolve("/Quartz")
        .await
        .expect("resolve root");

    assert_eq!(node.kind(), ObjectKind::BatchSystem);
    assert_eq!(node.path().as_str(), "/Quartz");
    assert_eq!(node.title(), "Quartz Batch System");
    for child in node.as_object().children() {
        assert_eq!(
            child.path().as_str(),
            format!("/Quartz/{}", child.title())
        );
        assert!(child.children().is_empty(), "unvisited levels stay empty");
    }
}

#[tokio::test]
async fn partition_badges_suppress_zero() {
    let node = resolver(alpha_beta_cluster())
        .resolve("/Quartz")
        .await
        .expect("resolve root");

    let badges = node
        .as_object()
        .children()
        .into_iter()
        .map(|child| (child.title().to_string(), child.badge()))
        .collect::<Vec<_>>();
    assert_eq!(
        badges,
        [
            ("alpha".to_string(), Badge::Text("3".into())),
            ("beta".to_string(), Badge::None),
        ]
    );
    assert_eq!(node.badge(), Badge::Text("2".into()));
}

#[tokio::test]
async fn job_path_costs_three_ordered_queries() {
    let adapter = alpha_beta_cluster();
    let node = resolver(adapter.clone())
        .resolve("/Quartz/alpha/102")
        .await
        .expect("resolve job");

    let RuntimeNode::Job(job) = &node else {
        panic!("expected a job, got {:?}", node.kind());
    };
    assert_eq!(job.state(), &JobState::Pending);
    assert_eq!(node.path().as_str(), "/Quartz/alpha/102");
    assert!(node.badge().is_none());

    assert_eq!(
        adapter.queries(),
        [
            ClusterQuery::ListPartitions,
            ClusterQuery::ListJobs {
                partition: "alpha".into()
            },
            ClusterQuery::JobDetail {
                job_id: "102".into()
            },
        ]
    );
    assert!(
        adapter
            .targets()
            .iter()
            .all(|target| target.host == SCHEDULER_HOST && target.port == 22)
    );
}

#[tokio::test]
async fn resolved_partition_lists_jobs_and_counts_them() {
    let adapter = alpha_beta_cluster();
    // The listing count is stale; the resolved partition counts its jobs.
    adapter.set_job_count("alpha", 7);

    let node = resolver(adapter.clone())
        .resolve("/Quartz/alpha")
        .await
        .expect("resolve partition");

    assert_eq!(node.child_titles(), ["101", "102", "103"]);
    assert_eq!(node.badge(), Badge::Text("3".into()));
    assert_eq!(adapter.query_count(), 2);
}

#[tokio::test]
async fn unknown_root_is_not_found_without_queries() {
    let adapter = alpha_beta_cluster();
    let err = resolver(adapter.clone())
        .resolve("/BigRed/alpha")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "object not found: /BigRed/alpha");
    assert_eq!(adapter.query_count(), 0);
}

#[tokio::test]
async fn unknown_root_is_not_found_even_when_cluster_is_down() {
    let adapter =
        Arc::new(ScriptedAdapter::new().fail_with("ssh: connection refused"));
    let err = resolver(adapter).resolve("/Nowhere").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn missing_partition_names_the_full_path() {
    let err = resolver(alpha_beta_cluster())
        .resolve("/Quartz/unknown")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("/Quartz/unknown"));
}

#[tokio::test]
async fn paths_below_jobs_are_not_found() {
    let adapter = alpha_beta_cluster();
    let err = resolver(adapter.clone())
        .resolve("/Quartz/alpha/101/stdout")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(adapter.query_count(), 2);
}

#[tokio::test]
async fn malformed_paths_are_protocol_errors() {
    for raw in ["", "Quartz", "/Quartz//alpha"] {
        let err = resolver(alpha_beta_cluster())
            .resolve(raw)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol, "{raw:?}");
    }
}

#[tokio::test]
async fn cluster_diagnostics_survive_verbatim() {
    let adapter =
        Arc::new(ScriptedAdapter::new().fail_with("ssh: connection refused"));
    let err = resolver(adapter).resolve("/Quartz").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClusterQuery);
    assert!(err.to_string().contains("ssh: connection refused"), "{err}");
}

#[tokio::test]
async fn duplicate_titles_bind_to_first_occurrence() {
    let adapter = Arc::new(
        ScriptedAdapter::new()
            .with_partition_count("alpha", 1)
            .with_partition_count("alpha", 9),
    );
    let node = resolver(adapter).resolve("/Quartz").await.expect("resolve");
    assert_eq!(node.child_titles(), ["alpha"]);
    let alpha = node.find_child("alpha").expect("alpha");
    assert_eq!(alpha.badge(), Badge::Text("1".into()));
}

#[tokio::test]
async fn duplicate_roots_use_the_first_binding() {
    let bindings = Arc::new(RootBindings::from_iter([
        RootBinding::new(ROOT, SchedulerHost::new("first.example.org", 2201)),
        RootBinding::new(ROOT, SchedulerHost::new("second.example.org", 2202)),
    ]));
    let adapter = alpha_beta_cluster();
    PathResolver::new(bindings, adapter.clone())
        .resolve("/Quartz")
        .await
        .expect("resolve");
    assert_eq!(
        adapter.targets(),
        [SchedulerHost::new("first.example.org", 2201)]
    );
}

#[tokio::test]
async fn origin_is_stamped_on_every_constructed_object() {
    let origin = Endpoint::new("runtime.example.org", 9100);
    let node = resolver(alpha_beta_cluster())
        .with_origin(origin.clone())
        .resolve("/Quartz/alpha")
        .await
        .expect("resolve");

    walk(&node, &mut |object| {
        assert_eq!(object.host(), Some("runtime.example.org"));
        assert_eq!(object.port(), Some(9100));
    });
}

#[tokio::test]
async fn repeated_resolution_is_stable() {
    let adapter = alpha_beta_cluster();
    let resolver = resolver(adapter.clone());
    let first = resolver.resolve("/Quartz").await.expect("first");
    adapter.set_job_count("alpha", 5);
    let second = resolver.resolve("/Quartz").await.expect("second");

    assert_eq!(first.title(), second.title());
    assert_eq!(first.child_titles(), second.child_titles());
    assert_ne!(first.badge().as_str(), "");
}
