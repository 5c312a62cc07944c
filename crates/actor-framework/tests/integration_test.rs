use actor_framework::{ActorEntity, FrameworkError, ResourceActor, ResourceClient, ScopeId};
use async_trait::async_trait;
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Parcel {
    id: u32,
    label: String,
    claimed_by: Option<String>,
}

#[derive(Debug)]
struct ParcelCreate {
    label: String,
}

#[derive(Clone, Debug)]
enum ParcelUpdate {
    Claim(String),
    Relabel(String),
}

#[derive(Debug, thiserror::Error)]
enum ParcelError {
    #[error("parcel {0} already claimed")]
    AlreadyClaimed(u32),
}

#[async_trait]
impl ActorEntity for Parcel {
    type Id = u32;
    type Create = ParcelCreate;
    type Update = ParcelUpdate;
    type Context = ();
    type Error = ParcelError;

    fn from_create_params(id: u32, params: ParcelCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            label: params.label,
            claimed_by: None,
        })
    }

    async fn on_update(&mut self, update: ParcelUpdate, _ctx: &()) -> Result<(), Self::Error> {
        match update {
            ParcelUpdate::Claim(owner) => {
                if self.claimed_by.is_some() {
                    return Err(ParcelError::AlreadyClaimed(self.id));
                }
                self.claimed_by = Some(owner);
            }
            ParcelUpdate::Relabel(label) => self.label = label,
        }
        Ok(())
    }
}

async fn start_with(labels: &[&str]) -> (ResourceClient<Parcel>, Vec<u32>) {
    let (actor, client) = ResourceActor::new(16);
    tokio::spawn(actor.run(()));
    let mut ids = Vec::new();
    for label in labels {
        let id = client
            .create(ParcelCreate {
                label: label.to_string(),
            })
            .await
            .unwrap();
        ids.push(id);
    }
    (client, ids)
}

fn unclaimed(p: &Parcel) -> bool {
    p.claimed_by.is_none()
}

// --- Tests ---

#[tokio::test]
async fn test_crud_lifecycle() {
    let (client, ids) = start_with(&["a", "b"]).await;
    assert_eq!(ids, vec![1, 2]);

    let updated = client
        .update(1, ParcelUpdate::Relabel("renamed".into()))
        .await
        .unwrap();
    assert_eq!(updated.label, "renamed");

    let all = client.list(|_: &Parcel| true).await.unwrap();
    assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

    let missing = client.update(99, ParcelUpdate::Relabel("x".into())).await;
    assert!(matches!(missing, Err(FrameworkError::NotFound(_))));
}

#[tokio::test]
async fn test_commit_publishes_staged_writes() {
    let (client, ids) = start_with(&["a", "b", "c"]).await;

    let scope = client.begin().await.unwrap();
    let staged = scope
        .stage(vec![ids[0], ids[2]], ParcelUpdate::Claim("r1".into()))
        .await
        .unwrap();
    assert_eq!(staged, 2);

    // Inside the scope the writes are visible.
    let open = scope.scan(unclaimed).await.unwrap();
    assert_eq!(open.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[1]]);

    // Outside the scope they are not.
    let outside = client.get(ids[0]).await.unwrap().unwrap();
    assert_eq!(outside.claimed_by, None);

    assert_eq!(scope.commit().await.unwrap(), 2);
    let after = client.list(unclaimed).await.unwrap();
    assert_eq!(after.len(), 1);
}

#[tokio::test]
async fn test_rollback_discards_staged_writes() {
    let (client, ids) = start_with(&["a"]).await;

    let scope = client.begin().await.unwrap();
    scope
        .stage(vec![ids[0]], ParcelUpdate::Claim("r1".into()))
        .await
        .unwrap();
    scope.rollback().await.unwrap();

    let parcel = client.get(ids[0]).await.unwrap().unwrap();
    assert_eq!(parcel.claimed_by, None);
}

#[tokio::test]
async fn test_dropped_scope_rolls_back_and_releases() {
    let (client, ids) = start_with(&["a"]).await;

    {
        let scope = client.begin().await.unwrap();
        scope
            .stage(vec![ids[0]], ParcelUpdate::Claim("r1".into()))
            .await
            .unwrap();
    }

    // The next scope is granted only once the abandoned one is rolled back.
    let scope = tokio::time::timeout(Duration::from_secs(1), client.begin())
        .await
        .expect("dropped scope should release the actor")
        .unwrap();
    let visible = scope.scan(unclaimed).await.unwrap();
    assert_eq!(visible.len(), 1);
    scope.commit().await.unwrap();
}

#[tokio::test]
async fn test_failing_hook_stages_nothing() {
    let (client, ids) = start_with(&["a", "b"]).await;
    client
        .update(ids[1], ParcelUpdate::Claim("earlier".into()))
        .await
        .unwrap();

    let scope = client.begin().await.unwrap();
    let result = scope
        .stage(ids.clone(), ParcelUpdate::Claim("r1".into()))
        .await;
    assert!(matches!(result, Err(FrameworkError::EntityError(_))));

    // The first parcel was not half-staged.
    assert_eq!(scope.scan(unclaimed).await.unwrap().len(), 1);
    assert_eq!(scope.commit().await.unwrap(), 0);
}

#[tokio::test]
async fn test_writes_wait_for_open_scope() {
    let (client, ids) = start_with(&["a"]).await;
    let scope = client.begin().await.unwrap();

    let writer = client.clone();
    let id = ids[0];
    let pending = tokio::spawn(async move {
        writer
            .update(id, ParcelUpdate::Claim("outside".into()))
            .await
    });

    // Reads are still served while the write waits.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());
    assert_eq!(client.get(id).await.unwrap().unwrap().claimed_by, None);

    scope
        .stage(vec![id], ParcelUpdate::Claim("inside".into()))
        .await
        .unwrap();
    scope.commit().await.unwrap();

    // Replayed after commit, the deferred write sees the committed claim.
    let replayed = pending.await.unwrap();
    assert!(matches!(replayed, Err(FrameworkError::EntityError(_))));
    let parcel = client.get(id).await.unwrap().unwrap();
    assert_eq!(parcel.claimed_by.as_deref(), Some("inside"));
}

#[tokio::test]
async fn test_scopes_are_granted_in_sequence() {
    let (client, ids) = start_with(&["a"]).await;
    let first = client.begin().await.unwrap();
    let first_id = first.id();
    first.commit().await.unwrap();

    let second = client.begin().await.unwrap();
    assert_ne!(second.id(), first_id);
    assert_eq!(second.id(), ScopeId(first_id.0 + 1));
    second
        .stage(vec![ids[0]], ParcelUpdate::Relabel("b".into()))
        .await
        .unwrap();
    second.commit().await.unwrap();

    assert_eq!(client.get(ids[0]).await.unwrap().unwrap().label, "b");
}

#[tokio::test]
async fn test_abandoned_deferred_write_is_dropped() {
    let (client, ids) = start_with(&["a"]).await;
    let scope = client.begin().await.unwrap();

    let gave_up = tokio::time::timeout(
        Duration::from_millis(20),
        client.update(ids[0], ParcelUpdate::Relabel("late".into())),
    )
    .await;
    assert!(gave_up.is_err());

    scope.rollback().await.unwrap();
    assert_eq!(client.get(ids[0]).await.unwrap().unwrap().label, "a");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dropped_scope_released_under_read_traffic() {
    let (client, ids) = start_with(&["a"]).await;
    let scope = client.begin().await.unwrap();

    let mut readers = Vec::new();
    for _ in 0..16 {
        let reader = client.clone();
        let id = ids[0];
        readers.push(tokio::spawn(async move {
            let stop = tokio::time::Instant::now() + Duration::from_millis(200);
            while tokio::time::Instant::now() < stop {
                reader.get(id).await.unwrap();
            }
        }));
    }

    drop(scope);
    let next = tokio::time::timeout(Duration::from_secs(1), client.begin())
        .await
        .expect("dropped scope should release the actor despite readers")
        .unwrap();
    next.rollback().await.unwrap();

    for reader in readers {
        reader.await.unwrap();
    }
}
