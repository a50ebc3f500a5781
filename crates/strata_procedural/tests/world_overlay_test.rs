//! # Overlay & Bounds Integration Test
//!
//! The edit overlay is the single source of truth for edited tiles, and
//! vertical out-of-range access degrades to Air reads / no-op writes.

use strata_core::SessionConfig;
use strata_procedural::{BlockType, WorldError, WorldField};

fn world() -> WorldField {
    WorldField::new(&SessionConfig::default())
}

/// An edit placed before the owning chunk exists survives generation and
/// shadows whatever was generated underneath.
#[test]
fn test_overlay_wins_before_and_after_generation() {
    let mut world = world();

    // Chunk 62 does not exist yet; edit anyway.
    world.set_block(1_000, 9, BlockType::Wood);
    assert!(!world.is_chunk_ready(62));

    // Overlay reads do not even need generation.
    assert_eq!(world.block(1_000, 9), BlockType::Wood);
    assert!(!world.is_chunk_ready(62));

    // Force generation; the edit still wins over the generated tile.
    let _ = world.column(1_000);
    assert!(world.is_chunk_ready(62));
    assert_eq!(world.block(1_000, 9), BlockType::Wood);
}

/// Breaking is just an Air overlay entry; the generated block never comes
/// back.
#[test]
fn test_break_is_permanent_air() {
    let mut world = world();
    let tx = 10;
    let surf = world.surface_height(tx);
    assert_eq!(world.block(tx, surf), BlockType::Grass);

    world.set_block(tx, surf, BlockType::Air);
    assert_eq!(world.block(tx, surf), BlockType::Air);

    world.ensure_chunk(world.chunk_of(tx));
    assert_eq!(world.block(tx, surf), BlockType::Air);
    assert_eq!(world.stats().overlay_entries, 1);
}

/// Overwriting an edit replaces it; entries never merge back into columns.
#[test]
fn test_overlay_overwrites_in_place() {
    let mut world = world();
    world.set_block(5, 5, BlockType::Stone);
    world.set_block(5, 5, BlockType::Dirt);
    assert_eq!(world.block(5, 5), BlockType::Dirt);
    assert_eq!(world.stats().overlay_entries, 1);
}

/// Rows outside `[0, world_height)` always read Air, no matter what was
/// written there.
#[test]
fn test_out_of_bounds_reads_air() {
    let mut world = world();
    world.set_block(0, -1, BlockType::Stone);
    world.set_block(0, 18, BlockType::Stone);
    world.set_block(0, i32::MAX, BlockType::Stone);

    assert_eq!(world.block(0, -1), BlockType::Air);
    assert_eq!(world.block(0, 18), BlockType::Air);
    assert_eq!(world.block(0, i32::MIN), BlockType::Air);
    // The writes were no-ops, not hidden entries.
    assert_eq!(world.stats().overlay_entries, 0);
}

/// Prefetch respects the per-tick budget and reports the overrun; reads
/// still work afterwards.
#[test]
fn test_prefetch_budget() {
    let config = SessionConfig {
        max_chunks_per_tick: 4,
        ..SessionConfig::default()
    };
    let mut world = WorldField::new(&config);

    // A narrow span fits the budget: 3 chunks (span plus margins).
    world.begin_tick();
    let generated = world.prefetch(0, 0).expect("narrow span fits budget");
    assert_eq!(generated, 3);

    // A huge span does not.
    world.begin_tick();
    let err = world.prefetch(0, 100 * 16).expect_err("huge span must overrun");
    assert!(matches!(
        err,
        WorldError::GenerationBudgetExceeded { budget: 4, .. }
    ));
    assert_eq!(world.stats().budget_overruns, 1);

    // The budget resets next tick, and reads never fail regardless.
    world.begin_tick();
    let _ = world.block(100 * 16, 9);
    assert!(world.is_chunk_ready(100));
}
