//! End-to-end domain aliasing: bind, resolve, release, rebind.

use bytes::Bytes;
use time::Duration;

use common::pointer::{self, MutableRecord, PointerProvider};
use common::registry::{PrivacyMode, RegistryError, RegistryProvider};
use common::resolver::ResolveError;
use common::store::ContentStore;
use common::testkit::TestEnv;
use common::wallet::Address;

const TTL: Duration = Duration::hours(48);

#[tokio::test]
async fn test_bind_resolve_release() {
    let env = TestEnv::with_domain_fee(100);
    let owner = Address::new("0xowner");
    let (name, secret) = pointer::create();

    let c1 = env.store().put(Bytes::from_static(b"v1")).await.unwrap();
    let record = MutableRecord::sign(&secret, c1, 0, TTL).unwrap();
    env.pointers().publish(record).await.unwrap();

    env.registry()
        .register(&owner, &name, None, PrivacyMode::Identified)
        .await
        .unwrap();

    // Underpaying is rejected
    let result = env.registry().bind_domain(&owner, &name, "feedback", 99).await;
    assert!(matches!(
        result,
        Err(RegistryError::InsufficientFee {
            required: 100,
            offered: 99,
        })
    ));

    env.registry()
        .bind_domain(&owner, &name, "feedback", 100)
        .await
        .unwrap();

    // The domain resolves to the identity's latest content
    let resolved = env.resolver().resolve("feedback").await.unwrap();
    assert_eq!(resolved.name(), &name);
    assert_eq!(resolved.pointed(), &c1);

    // After release the domain resolves nowhere
    env.registry().release_domain(&owner, &name).await.unwrap();
    let result = env.resolver().resolve("feedback").await;
    assert!(matches!(result, Err(ResolveError::DomainNotFound(_))));

    // The raw name still resolves
    let resolved = env.resolver().resolve(name.as_str()).await.unwrap();
    assert_eq!(resolved.pointed(), &c1);
}

#[tokio::test]
async fn test_domain_uniqueness_across_owners() {
    let env = TestEnv::new();
    let alice = Address::new("0xalice");
    let bob = Address::new("0xbob");
    let (name_a, secret_a) = pointer::create();
    let (name_b, secret_b) = pointer::create();

    let c_a = env.store().put(Bytes::from_static(b"alice's form")).await.unwrap();
    let c_b = env.store().put(Bytes::from_static(b"bob's form")).await.unwrap();
    env.pointers()
        .publish(MutableRecord::sign(&secret_a, c_a, 0, TTL).unwrap())
        .await
        .unwrap();
    env.pointers()
        .publish(MutableRecord::sign(&secret_b, c_b, 0, TTL).unwrap())
        .await
        .unwrap();

    env.registry()
        .register(&alice, &name_a, None, PrivacyMode::Identified)
        .await
        .unwrap();
    env.registry()
        .register(&bob, &name_b, None, PrivacyMode::Identified)
        .await
        .unwrap();

    env.registry()
        .bind_domain(&alice, &name_a, "feedback", 0)
        .await
        .unwrap();

    // At most one active binding per domain
    let result = env.registry().bind_domain(&bob, &name_b, "feedback", 0).await;
    assert!(matches!(result, Err(RegistryError::DomainTaken(_))));

    // Once released, anyone can claim it
    env.registry().release_domain(&alice, &name_a).await.unwrap();
    env.registry()
        .bind_domain(&bob, &name_b, "feedback", 0)
        .await
        .unwrap();

    let resolved = env.resolver().resolve("feedback").await.unwrap();
    assert_eq!(resolved.name(), &name_b);
    assert_eq!(resolved.pointed(), &c_b);
}

#[tokio::test]
async fn test_retired_identity_stays_queryable() {
    let env = TestEnv::new();
    let owner = Address::new("0xowner");
    let (name, secret) = pointer::create();

    let c1 = env.store().put(Bytes::from_static(b"v1")).await.unwrap();
    env.pointers()
        .publish(MutableRecord::sign(&secret, c1, 0, TTL).unwrap())
        .await
        .unwrap();
    env.registry()
        .register(&owner, &name, None, PrivacyMode::Identified)
        .await
        .unwrap();

    env.registry().set_active(&owner, &name, false).await.unwrap();

    // Soft delete: the entry and its history remain readable
    let entry = env.registry().lookup_entry(&name).await.unwrap();
    assert!(!entry.active);

    env.registry().set_active(&owner, &name, true).await.unwrap();
    let entry = env.registry().lookup_entry(&name).await.unwrap();
    assert!(entry.active);
}
