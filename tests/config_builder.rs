use CardCube::config::{CubeConfig, CubeConfigBuilder};
use CardCube::consts::{
    ENV_CELL_LOCK_STRIPES, ENV_DUMP_ZSTD, ENV_HLL_PRECISION, ENV_ZSTD_LEVEL, HLL_DEFAULT_PRECISION,
};
use CardCube::persist::DumpOptions;
use CardCube::{Board, Cube};

// Все проверки ENV в одном тесте: переменные окружения общие для процесса.
#[test]
fn env_then_builder_overrides() {
    std::env::set_var(ENV_HLL_PRECISION, "11");
    std::env::set_var(ENV_CELL_LOCK_STRIPES, "0");
    std::env::set_var(ENV_DUMP_ZSTD, "yes");
    std::env::set_var(ENV_ZSTD_LEVEL, " 7 ");

    let cfg = CubeConfig::from_env();
    assert_eq!(cfg.hll_precision, 11);
    assert_eq!(cfg.cell_lock_stripes, 1, "0 stripes is treated as 1");
    assert!(cfg.dump_zstd);
    assert_eq!(cfg.zstd_level, 7);

    let cfg = CubeConfig::builder()
        .hll_precision(40)
        .cell_lock_stripes(8)
        .dump_zstd(false)
        .build();
    assert_eq!(cfg.hll_precision, 18, "precision is clamped");
    assert_eq!(cfg.cell_lock_stripes, 8);
    assert!(!cfg.dump_zstd);
    assert_eq!(cfg.zstd_level, 7);

    std::env::set_var(ENV_HLL_PRECISION, "garbage");
    assert_eq!(CubeConfig::from_env().hll_precision, HLL_DEFAULT_PRECISION);

    for k in [ENV_HLL_PRECISION, ENV_CELL_LOCK_STRIPES, ENV_DUMP_ZSTD, ENV_ZSTD_LEVEL] {
        std::env::remove_var(k);
    }
    let cfg = CubeConfig::from_env();
    assert_eq!(cfg.hll_precision, HLL_DEFAULT_PRECISION);
    assert!(!cfg.dump_zstd);
}

#[test]
fn config_flows_into_board_cube_and_dump() {
    let cfg = CubeConfigBuilder::from_default()
        .hll_precision(2)
        .cell_lock_stripes(4)
        .dump_zstd(true)
        .zstd_level(5)
        .build();

    let cube = Cube::from_config(&cfg);
    assert_eq!(cube.precision(), 4);

    let board = Board::from_config(&cfg);
    assert_eq!(board.cell_lock_stripes(), 4);
    let cell = board.get_cell("r", "c", true).expect("created");
    assert_eq!(cell.precision(), 4);

    let opts = DumpOptions::from_config(&cfg);
    assert!(opts.zstd);
    assert_eq!(opts.zstd_level, 5);

    let shown = cfg.to_string();
    assert!(shown.contains("hll_precision: 4"));
    assert!(shown.contains("cell_lock_stripes: 4"));
}
