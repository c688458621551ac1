//! End-to-end lifecycle: one identity, many document versions, one
//! identifier throughout.

use bytes::Bytes;
use time::Duration;

use common::pointer::{self, MutableRecord, PointerError, PointerProvider};
use common::registry::{PrivacyMode, RegistryProvider};
use common::store::ContentStore;
use common::testkit::TestEnv;
use common::wallet::WalletSigner;

const TTL: Duration = Duration::hours(48);

#[tokio::test]
async fn test_create_update_resolve() {
    let env = TestEnv::new();
    let resolver = env.resolver();
    let (name, secret) = pointer::create();

    // Create: upload the first version and publish sequence 0
    let c1 = env
        .store()
        .put(Bytes::from_static(b"form version 1"))
        .await
        .unwrap();
    let first = MutableRecord::sign(&secret, c1, 0, TTL).unwrap();
    env.pointers().publish(first.clone()).await.unwrap();

    let resolved = resolver.resolve(name.as_str()).await.unwrap();
    assert_eq!(resolved.pointed(), &c1);

    // Update: upload a second version and publish sequence 1; the
    // identifier never changes
    let c2 = env
        .store()
        .put(Bytes::from_static(b"form version 2"))
        .await
        .unwrap();
    let second = first.next(&secret, c2, TTL).unwrap();
    env.pointers().publish(second.clone()).await.unwrap();

    let resolved = resolver.resolve(name.as_str()).await.unwrap();
    assert_eq!(resolved.pointed(), &c2);
    assert_eq!(resolved.sequence(), 1);

    // The resolved link fetches the current bytes
    let data = env.store().get(resolved.pointed()).await.unwrap();
    assert_eq!(&data[..], b"form version 2");

    // A duplicate publish of sequence 1 is rejected, not duplicated
    let duplicate = first.next(&secret, c2, TTL).unwrap();
    let result = env.pointers().publish(duplicate).await;
    assert!(matches!(
        result,
        Err(PointerError::StaleSequence { have: 1, tried: 1, .. })
    ));

    // Resolution is unaffected by the rejected duplicate
    let resolved = resolver.resolve(name.as_str()).await.unwrap();
    assert_eq!(resolved.pointed(), &c2);
}

#[tokio::test]
async fn test_only_the_key_holder_can_update() {
    let env = TestEnv::new();
    let (name, secret) = pointer::create();
    let (_, intruder) = pointer::create();

    let c1 = env.store().put(Bytes::from_static(b"v1")).await.unwrap();
    let first = MutableRecord::sign(&secret, c1, 0, TTL).unwrap();
    env.pointers().publish(first.clone()).await.unwrap();

    // The intruder cannot extend the chain: signing with a foreign key is
    // rejected at construction
    let c2 = env.store().put(Bytes::from_static(b"evil")).await.unwrap();
    assert!(first.next(&intruder, c2, TTL).is_err());

    // A record the intruder signs under their own name does not affect
    // this identity
    let foreign = MutableRecord::sign(&intruder, c2, 0, TTL).unwrap();
    env.pointers().publish(foreign).await.unwrap();

    let resolved = env.resolver().resolve(name.as_str()).await.unwrap();
    assert_eq!(resolved.pointed(), &c1);
}

#[tokio::test]
async fn test_key_recovery_continues_the_chain() {
    let env = TestEnv::new();
    let vault = env.vault();
    let wallet = TestEnv::wallet();
    let (name, secret) = pointer::create();

    let c1 = env.store().put(Bytes::from_static(b"v1")).await.unwrap();
    let first = MutableRecord::sign(&secret, c1, 0, TTL).unwrap();
    env.pointers().publish(first).await.unwrap();

    // Back the key up and register the locator
    let locator = vault.backup(&secret, &wallet).await.unwrap();
    env.registry()
        .register(&wallet.address(), &name, Some(locator), PrivacyMode::Identified)
        .await
        .unwrap();

    // New device: look the locator up, restore, keep publishing
    let entry = env.registry().lookup_entry(&name).await.unwrap();
    let locator = entry.encrypted_key_locator.unwrap();
    let recovered = vault.restore(&locator, &name, &wallet).await.unwrap();

    let c2 = env.store().put(Bytes::from_static(b"v2")).await.unwrap();
    let latest = env.pointers().resolve_latest(&name).await.unwrap();
    let second = latest.next(&recovered, c2, TTL).unwrap();
    env.pointers().publish(second).await.unwrap();

    let resolved = env.resolver().resolve(name.as_str()).await.unwrap();
    assert_eq!(resolved.pointed(), &c2);
    assert_eq!(resolved.sequence(), 1);
}
