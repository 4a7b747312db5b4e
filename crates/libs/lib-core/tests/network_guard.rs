//! # Network Guard Tests

mod common;

use common::Harness;
use lib_core::provider::mock::{MockProvider, SwitchBehavior};
use lib_core::provider::methods;
use lib_core::{GuardStatus, MemoryStore};
use shared::ChainId;

#[tokio::test]
async fn test_mismatch_prompt_clears_after_switch() {
    // Arrange: wallet on Polygon, route needs mainnet
    let harness = Harness::new(MockProvider::new().with_chain(ChainId::POLYGON));
    harness.connect().await;

    // Act
    let before = harness.guard.check("/dashboard").await.unwrap();

    // Assert
    assert_eq!(
        before,
        GuardStatus::Mismatch {
            required: ChainId::ETHEREUM,
            current: ChainId::POLYGON
        }
    );
    assert!(harness.guard.prompt_open());

    // Act: one-click switch
    let after = harness.guard.switch("/dashboard").await.unwrap();

    // Assert
    assert_eq!(
        after,
        GuardStatus::Satisfied {
            chain: ChainId::ETHEREUM
        }
    );
    assert!(!harness.guard.prompt_open());
    assert!(harness.session.correct_network());
}

#[tokio::test]
async fn test_route_specific_requirement() {
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;

    assert!(harness.guard.check("/staking").await.unwrap().is_mismatch());
    harness.guard.switch("/staking").await.unwrap();

    assert_eq!(harness.mock.chain(), ChainId::SEPOLIA);
    assert!(!harness.guard.prompt_open());
    // Sepolia is not the session-wide required chain
    assert!(!harness.session.correct_network());
}

#[tokio::test]
async fn test_unrestricted_route_never_prompts() {
    let harness = Harness::new(MockProvider::new().with_chain(ChainId::BSC));
    harness.connect().await;
    assert_eq!(
        harness.guard.check("/settings").await.unwrap(),
        GuardStatus::NoRequirement
    );
    assert!(!harness.guard.prompt_open());
}

#[tokio::test]
async fn test_wallet_side_chain_change_detected_on_next_check() {
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;
    assert!(!harness.guard.check("/portfolio").await.unwrap().is_mismatch());

    harness.mock.change_chain(ChainId::ARBITRUM);

    assert!(harness.guard.refresh("/portfolio").is_mismatch());
    assert!(harness.guard.check("/portfolio").await.unwrap().is_mismatch());
}

#[tokio::test]
async fn test_failed_switch_keeps_mismatch() {
    let harness = Harness::new(MockProvider::new().with_chain(ChainId::POLYGON));
    harness.connect().await;
    harness.guard.check("/dashboard").await.unwrap();

    harness
        .mock
        .set_switch_behavior(SwitchBehavior::Fail("Internal JSON-RPC error".to_string()));
    assert!(harness.guard.switch("/dashboard").await.is_err());

    assert!(harness.guard.prompt_open());
    assert_eq!(harness.mock.chain(), ChainId::POLYGON);
}

#[tokio::test]
async fn test_slow_check_does_not_leak_into_next_route() {
    // Arrange: wallet on Polygon whose chain lookup stalls
    let (harness, wallet) = Harness::gated(
        MockProvider::new().with_chain(ChainId::POLYGON),
        MemoryStore::new(),
    );
    harness.connect().await;
    wallet.hold_next(methods::CHAIN_ID);

    // Act: leave /dashboard for / while its check is still pending
    let (dashboard, landing) = tokio::join!(harness.guard.check("/dashboard"), async {
        wallet.held().await;
        let landing = harness.guard.check("/").await;
        wallet.release();
        landing
    });

    // Assert
    assert_eq!(landing.unwrap(), GuardStatus::NoRequirement);
    assert_eq!(dashboard.unwrap(), GuardStatus::NoRequirement);
    assert_eq!(harness.guard.status(), GuardStatus::NoRequirement);
    assert!(!harness.guard.prompt_open());

    // Assert: checking /dashboard again still reports the real mismatch
    assert!(harness.guard.check("/dashboard").await.unwrap().is_mismatch());
}
