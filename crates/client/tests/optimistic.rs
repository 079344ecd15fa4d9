use std::sync::Arc;

use huddle_client::{
    ClientError, Coordinator, GatewayError, InMemoryGateway, MemorySink, Notification,
    NotificationKind,
};
use huddle_core::{CategoryId, EmailSet, GroupId};
use huddle_directory::{CategoryPatch, GroupPatch, NewCategory, NewGroup};
use huddle_infra::{seed, DirectoryRepository, InMemoryDirectory};

struct Harness {
    coordinator: Coordinator,
    gateway: Arc<InMemoryGateway>,
    sink: Arc<MemorySink>,
}

impl Harness {
    async fn with_directory(directory: InMemoryDirectory) -> Self {
        let gateway = Arc::new(InMemoryGateway::new(Arc::new(directory)));
        let sink = Arc::new(MemorySink::new());
        let coordinator = Coordinator::connect(gateway.clone(), sink.clone())
            .await
            .expect("initial load");
        Self { coordinator, gateway, sink }
    }

    async fn seeded() -> Self {
        Self::with_directory(seed::seeded().unwrap()).await
    }

    /// Default groups only; no categories.
    async fn groups_only() -> Self {
        let directory = InMemoryDirectory::new();
        for group in seed::default_groups().unwrap() {
            directory.create_group(group).unwrap();
        }
        Self::with_directory(directory).await
    }

    fn fail_next(&self) {
        self.gateway
            .inject_failure(GatewayError::Api { status: 500, message: "boom".into() });
    }

    fn group_ids(&self) -> Vec<String> {
        self.coordinator
            .groups()
            .into_iter()
            .map(|g| g.id.to_string())
            .collect()
    }
}

fn gid(s: &str) -> GroupId {
    GroupId::new(s).unwrap()
}

fn cid(s: &str) -> CategoryId {
    CategoryId::new(s).unwrap()
}

fn tech_team() -> NewGroup {
    NewGroup::new(
        gid("tech-team"),
        "Technical Team",
        "Technology",
        EmailSet::parse(["tech.lead@flexothene.com", "developer@flexothene.com"]).unwrap(),
    )
    .unwrap()
}

fn success(message: &str) -> Notification {
    Notification { message: message.into(), kind: NotificationKind::Success }
}

fn failure(message: &str) -> Notification {
    Notification { message: message.into(), kind: NotificationKind::Error }
}

#[tokio::test]
async fn initial_load_clears_loading_flag() {
    let gateway = Arc::new(InMemoryGateway::new(Arc::new(seed::seeded().unwrap())));
    let coordinator = Coordinator::new(gateway, Arc::new(MemorySink::new()));
    assert!(coordinator.is_loading());

    coordinator.refresh().await.unwrap();

    assert!(!coordinator.is_loading());
    assert_eq!(coordinator.groups().len(), 3);
    assert_eq!(coordinator.categories().len(), 3);
}

#[tokio::test]
async fn failed_refresh_notifies_and_keeps_projection() {
    let h = Harness::seeded().await;
    let before = h.coordinator.groups();
    h.fail_next();

    let err = h.coordinator.refresh().await.unwrap_err();

    assert!(matches!(err, ClientError::Remote(_)));
    assert_eq!(h.coordinator.groups(), before);
    assert_eq!(h.sink.take(), vec![failure("Failed to fetch admin data")]);
}

#[tokio::test]
async fn create_success_reconciles_to_server_value() {
    let h = Harness::with_directory(InMemoryDirectory::new()).await;

    let saved = h.coordinator.create_group(tech_team()).await.unwrap();

    let groups = h.coordinator.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0], saved);
    assert_eq!(h.gateway.directory().list_groups().unwrap(), vec![saved]);
    assert_eq!(h.sink.take(), vec![success("Group created successfully")]);
}

#[tokio::test]
async fn create_failure_removes_speculative_entry() {
    let h = Harness::seeded().await;
    h.fail_next();
    let new = NewGroup::new(gid("design-team"), "Design", "Design", EmailSet::new()).unwrap();

    let err = h.coordinator.create_group(new).await.unwrap_err();

    assert!(matches!(err, ClientError::Remote(GatewayError::Api { status: 500, .. })));
    assert!(h.coordinator.group(&gid("design-team")).is_none());
    assert_eq!(h.group_ids(), ["tech-team", "product-team", "qa-team"]);
    assert_eq!(h.sink.take(), vec![failure("Failed to create group")]);
}

#[tokio::test]
async fn create_conflict_restores_local_entry() {
    let h = Harness::seeded().await;
    let before = h.coordinator.group(&gid("tech-team")).unwrap();

    let err = h.coordinator.create_group(tech_team()).await.unwrap_err();

    assert!(matches!(err, ClientError::Conflict { .. }));
    assert_eq!(h.coordinator.group(&gid("tech-team")), Some(before));
    assert_eq!(h.sink.take(), vec![failure("Failed to create group")]);
}

#[tokio::test]
async fn update_failure_restores_exact_prior_value() {
    let h = Harness::seeded().await;
    let before = h.coordinator.group(&gid("qa-team")).unwrap();
    h.fail_next();

    let patch = GroupPatch::default()
        .name("Quality")
        .emails(EmailSet::parse(["qa@flexothene.com"]).unwrap());
    h.coordinator.update_group(&gid("qa-team"), patch).await.unwrap_err();

    assert_eq!(h.coordinator.group(&gid("qa-team")), Some(before));
    assert_eq!(h.sink.take(), vec![failure("Failed to update group")]);
}

#[tokio::test]
async fn update_success_keeps_unpatched_fields() {
    let h = Harness::seeded().await;
    let before = h.coordinator.group(&gid("qa-team")).unwrap();

    let saved = h
        .coordinator
        .update_group(&gid("qa-team"), GroupPatch::default().department("QA"))
        .await
        .unwrap();

    assert_eq!(saved.name, before.name);
    assert_eq!(saved.emails, before.emails);
    assert_eq!(saved.department, "QA");
    assert_eq!(h.coordinator.group(&gid("qa-team")), Some(saved));
    assert_eq!(h.sink.take(), vec![success("Group updated successfully")]);
}

#[tokio::test]
async fn delete_failure_restores_original_index() {
    let h = Harness::seeded().await;
    let before = h.coordinator.groups();
    h.fail_next();

    h.coordinator.delete_group(&gid("product-team")).await.unwrap_err();

    assert_eq!(h.coordinator.groups(), before);
    assert_eq!(h.sink.take(), vec![failure("Failed to delete group")]);
}

#[tokio::test]
async fn category_create_failure_removes_speculative_entry() {
    let h = Harness::seeded().await;
    let before = h.coordinator.categories();
    h.gateway.inject_failure(GatewayError::Network("connection reset".into()));
    let new = NewCategory::new(cid("release-review"), "Release Review", [gid("qa-team")]).unwrap();

    let err = h.coordinator.create_category(new).await.unwrap_err();

    assert!(matches!(err, ClientError::Remote(GatewayError::Network(_))));
    assert!(h.coordinator.category(&cid("release-review")).is_none());
    assert_eq!(h.coordinator.categories(), before);
    assert_eq!(h.sink.take(), vec![failure("Failed to create category")]);
}

#[tokio::test]
async fn category_update_failure_restores_exact_prior_value() {
    let h = Harness::seeded().await;
    let before = h.coordinator.categories();
    h.fail_next();

    let patch = CategoryPatch::default()
        .name("Tech Sign-off")
        .required_groups([gid("product-team")]);
    h.coordinator
        .update_category(&cid("technical-review"), patch)
        .await
        .unwrap_err();

    assert_eq!(h.coordinator.categories(), before);
    assert_eq!(h.sink.take(), vec![failure("Failed to update category")]);
}

#[tokio::test]
async fn category_delete_failure_restores_original_index() {
    let h = Harness::seeded().await;
    let before = h.coordinator.categories();
    h.fail_next();

    h.coordinator.delete_category(&cid("product-planning")).await.unwrap_err();

    let after = h.coordinator.categories();
    assert_eq!(after, before);
    assert_eq!(after[1].id, cid("product-planning"));
    assert_eq!(h.sink.take(), vec![failure("Failed to delete category")]);
}

#[tokio::test]
async fn missing_local_entity_is_not_found_without_side_effects() {
    let h = Harness::seeded().await;
    let calls = h.gateway.calls();

    let err = h
        .coordinator
        .update_category(&cid("ghost-review"), CategoryPatch::default().name("Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));

    let err = h.coordinator.delete_group(&gid("ghost-team")).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));

    assert_eq!(h.gateway.calls(), calls);
    assert!(h.sink.notifications().is_empty());
}

#[tokio::test]
async fn invalid_input_is_rejected_before_apply() {
    let h = Harness::seeded().await;
    let calls = h.gateway.calls();

    let err = h
        .coordinator
        .update_group(&gid("qa-team"), GroupPatch::default().name("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(h.gateway.calls(), calls);
    assert!(h.sink.notifications().is_empty());
}

#[tokio::test]
async fn deleting_referenced_group_leaves_ref_but_drops_it_from_join() {
    let h = Harness::seeded().await;

    h.coordinator.delete_group(&gid("tech-team")).await.unwrap();

    let review = h.coordinator.category(&cid("technical-review")).unwrap();
    assert!(review.required_group_ids.contains(&gid("tech-team")));
    assert!(review.required_groups.iter().all(|g| g.id != gid("tech-team")));
    assert_eq!(review.required_groups.len(), 1);
    assert_eq!(
        h.coordinator.dangling_refs(&cid("technical-review")).unwrap(),
        vec![gid("tech-team")]
    );
    assert_eq!(h.sink.take(), vec![success("Group deleted successfully")]);
}

#[tokio::test]
async fn optimistic_category_create_materializes_existing_group_immediately() {
    let h = Harness::groups_only().await;
    let release = h.gateway.gate_next();
    let new = NewCategory::new(cid("qa-review"), "QA Review", [gid("qa-team")]).unwrap();

    let create = h.coordinator.create_category(new);
    let observe = async {
        // `create` has applied locally and is parked on the gated remote call.
        let pending = h.coordinator.category(&cid("qa-review")).expect("optimistic entry");
        assert_eq!(pending.required_groups.len(), 1);
        assert_eq!(pending.required_groups[0].id, gid("qa-team"));
        assert!(h.sink.notifications().is_empty());
        release.send(()).unwrap();
    };
    let (created, ()) = tokio::join!(create, observe);

    let created = created.unwrap();
    assert_eq!(h.coordinator.category(&cid("qa-review")), Some(created));
    assert_eq!(h.sink.take(), vec![success("Category created successfully")]);
}

#[tokio::test]
async fn update_racing_delete_keeps_ref_but_join_omits_deleted_group() {
    let h = Harness::seeded().await;
    let release = h.gateway.gate_next();
    let qa_review = cid("qa-review");

    let update = h.coordinator.update_category(
        &qa_review,
        CategoryPatch::default().required_groups([gid("qa-team"), gid("tech-team")]),
    );
    let delete_first = async {
        h.coordinator.delete_group(&gid("tech-team")).await.unwrap();
        release.send(()).unwrap();
    };
    let (updated, ()) = tokio::join!(update, delete_first);
    updated.unwrap();

    let review = h.coordinator.category(&qa_review).unwrap();
    assert!(review.required_group_ids.contains(&gid("tech-team")));
    assert!(review.required_group_ids.contains(&gid("qa-team")));
    assert_eq!(review.required_groups.len(), 1);
    assert_eq!(review.required_groups[0].id, gid("qa-team"));
    assert!(h.coordinator.group(&gid("tech-team")).is_none());

    let notifications = h.sink.take();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.kind == NotificationKind::Success));
}

#[tokio::test]
async fn required_attendees_follow_local_groups() {
    let h = Harness::seeded().await;

    let before = h.coordinator.required_attendees(&cid("technical-review")).unwrap();
    assert_eq!(before.len(), 4);

    h.coordinator.delete_group(&gid("qa-team")).await.unwrap();

    let after: Vec<String> = h
        .coordinator
        .required_attendees(&cid("technical-review"))
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(after, ["developer@flexothene.com", "tech.lead@flexothene.com"]);
}

#[tokio::test]
async fn refresh_picks_up_server_side_cascade() {
    let h = Harness::seeded().await;
    h.coordinator.delete_group(&gid("tech-team")).await.unwrap();
    assert!(!h.coordinator.dangling_refs(&cid("technical-review")).unwrap().is_empty());

    h.coordinator.refresh().await.unwrap();

    assert!(h.coordinator.dangling_refs(&cid("technical-review")).unwrap().is_empty());
    assert_eq!(h.coordinator.categories_requiring(&gid("tech-team")), Vec::<CategoryId>::new());
}

#[tokio::test]
async fn every_mutation_emits_exactly_one_notification() {
    let h = Harness::groups_only().await;

    h.coordinator
        .create_category(NewCategory::new(cid("qa-review"), "QA Review", [gid("qa-team")]).unwrap())
        .await
        .unwrap();
    h.coordinator
        .update_category(&cid("qa-review"), CategoryPatch::default().name("QA Sign-off"))
        .await
        .unwrap();
    h.fail_next();
    h.coordinator.delete_category(&cid("qa-review")).await.unwrap_err();
    h.coordinator.delete_category(&cid("qa-review")).await.unwrap();

    assert_eq!(
        h.sink.take(),
        vec![
            success("Category created successfully"),
            success("Category updated successfully"),
            failure("Failed to delete category"),
            success("Category deleted successfully"),
        ]
    );
    assert!(h.coordinator.categories().is_empty());
}
