#![allow(non_snake_case)]

use alloy::primitives::{B256, U256, keccak256};
use alloy::sol_types::{SolCall, SolEvent};
use quantum_abi::{FieldPos, QuantumGrid, game_commitment_hash};

fn selector_for(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[test]
fn abi__function_selectors_match_the_published_interface() {
    assert_eq!(
        QuantumGrid::startGameCall::SELECTOR,
        selector_for("startGame(uint256,uint256,uint256)")
    );
    assert_eq!(
        QuantumGrid::submitGameResultCall::SELECTOR,
        selector_for("submitGameResult(uint256,uint256,uint256[],bytes32)")
    );
    assert_eq!(
        QuantumGrid::claimWinningsCall::SELECTOR,
        selector_for("claimWinnings()")
    );
    assert_eq!(
        QuantumGrid::fundHouseCall::SELECTOR,
        selector_for("fundHouse()")
    );
    assert_eq!(
        QuantumGrid::getPlayerStatsCall::SELECTOR,
        selector_for("getPlayerStats(address)")
    );
    assert_eq!(
        QuantumGrid::getDailyLeaderboardCall::SELECTOR,
        selector_for("getDailyLeaderboard()")
    );
    assert_eq!(
        QuantumGrid::getStatsCall::SELECTOR,
        selector_for("getStats()")
    );
}

#[test]
fn abi__event_topics_match_the_published_interface() {
    assert_eq!(
        QuantumGrid::GameStarted::SIGNATURE_HASH,
        keccak256("GameStarted(address,uint256,uint256,uint256,uint256)".as_bytes())
    );
    assert_eq!(
        QuantumGrid::GameCompleted::SIGNATURE_HASH,
        keccak256("GameCompleted(address,uint256,uint256,uint256,bool)".as_bytes())
    );
    assert_eq!(
        QuantumGrid::WinningsClaimed::SIGNATURE_HASH,
        keccak256("WinningsClaimed(address,uint256)".as_bytes())
    );
}

#[test]
fn abi__start_game_calldata_lays_out_three_words() {
    // given
    let call = QuantumGrid::startGameCall {
        gridSize: U256::from(8u64),
        quantumFields: U256::from(12u64),
        difficulty: U256::from(50u64),
    };

    // when
    let encoded = call.abi_encode();

    // then
    assert_eq!(encoded.len(), 4 + 3 * 32);
    assert_eq!(&encoded[..4], QuantumGrid::startGameCall::SELECTOR);
    assert_eq!(&encoded[4..36], U256::from(8u64).to_be_bytes::<32>().as_slice());
    assert_eq!(
        &encoded[36..68],
        U256::from(12u64).to_be_bytes::<32>().as_slice()
    );
    assert_eq!(
        &encoded[68..100],
        U256::from(50u64).to_be_bytes::<32>().as_slice()
    );
}

#[test]
fn abi__submit_game_result_encodes_the_position_array() {
    // given
    let positions = vec![U256::from(1u64), U256::from(6u64), U256::from(19u64)];
    let game_hash = B256::repeat_byte(0xab);
    let call = QuantumGrid::submitGameResultCall {
        score: U256::from(1414u64),
        revealedCells: U256::from(3u64),
        revealedPositions: positions,
        gameHash: game_hash,
    };

    // when
    let encoded = call.abi_encode();

    // then: head (4 words) + offset target holding length + 3 elements
    assert_eq!(&encoded[..4], QuantumGrid::submitGameResultCall::SELECTOR);
    assert_eq!(encoded.len(), 4 + 4 * 32 + 32 + 3 * 32);
    // the dynamic array offset points past the four head words
    assert_eq!(
        &encoded[4 + 2 * 32..4 + 3 * 32],
        U256::from(4 * 32).to_be_bytes::<32>().as_slice()
    );
    // array length word
    assert_eq!(
        &encoded[4 + 4 * 32..4 + 5 * 32],
        U256::from(3u64).to_be_bytes::<32>().as_slice()
    );
    assert_eq!(&encoded[4 + 3 * 32..4 + 4 * 32], game_hash.as_slice());
}

#[test]
fn abi__commitment_hash_is_stable_for_identical_games() {
    let grid = vec![vec![0u8, 1], vec![1, 0]];
    let fields = [FieldPos { row: 0, col: 1 }, FieldPos { row: 1, col: 0 }];

    let a = game_commitment_hash(&grid, &fields, 50, 1_700_000_000_000);
    let b = game_commitment_hash(&grid, &fields, 50, 1_700_000_000_000);
    let c = game_commitment_hash(&grid, &fields, 70, 1_700_000_000_000);

    assert_eq!(a, b);
    assert_ne!(a, c);
}
