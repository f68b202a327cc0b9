use anyhow::Result;
use std::sync::Arc;

use CardCube::{Board, CellOrigin, Cube, CubeConfig, RowStore};

fn board() -> Board {
    Board::from_config(&CubeConfig::default().with_hll_precision(14))
}

#[test]
fn get_without_create_never_inserts() {
    let b = board();

    for _ in 0..10 {
        assert!(b.get_cell("r", "c", false).is_none());
    }
    assert!(!b.row_exists("r"));
    assert_eq!(b.row_count(), 0);

    // Строка есть, ячейки нет - всё равно ничего не создаём
    b.get_cell("r", "other", true).expect("created");
    assert!(b.get_cell("r", "c", false).is_none());
    assert_eq!(b.cell_count("r"), 1);
    assert_eq!(b.cell_names("r"), vec!["other".to_string()]);
}

#[test]
fn create_returns_same_cell_on_repeat() {
    let b = board();
    let c1 = b.get_cell("r", "c", true).expect("created");
    let c2 = b.get_cell("r", "c", true).expect("present");
    let c3 = b.get_cell("r", "c", false).expect("present");
    assert!(Arc::ptr_eq(&c1, &c2));
    assert!(Arc::ptr_eq(&c1, &c3));
    assert_eq!(c1.origin(), CellOrigin::Generated);
    assert_eq!(c1.precision(), 14);
}

#[test]
fn drop_row_clears_presence_and_recreates_fresh() {
    let b = board();
    b.push("r", "x", b"alpha");
    b.push("r", "x", b"beta");
    let before = b.get_cell("r", "x", false).expect("present");
    assert_eq!(before.count(), 2);

    assert!(b.drop_row("r"));
    assert!(!b.row_exists("r"));
    assert!(b.get_cell("r", "x", false).is_none());
    assert_eq!(b.cell_count("r"), 0);
    assert!(b.cell_names("r").is_empty());

    // Повторный drop - no-op
    assert!(!b.drop_row("r"));

    let fresh = b.get_cell("r", "x", true).expect("recreated");
    assert!(!Arc::ptr_eq(&before, &fresh));
    assert_eq!(fresh.count(), 0);
}

#[test]
fn names_counts_and_snapshots() -> Result<()> {
    let b = board();
    for v in ["a", "b", "c", "a"] {
        b.push("r2", "visitors", v.as_bytes());
    }
    b.push("r1", "visitors", b"x");
    b.push("r1", "clicks", b"x");
    b.push("r1", "clicks", b"y");

    assert_eq!(b.row_names(), vec!["r1".to_string(), "r2".to_string()]);
    assert_eq!(b.row_count(), 2);
    assert_eq!(
        b.cell_names("r1"),
        vec!["clicks".to_string(), "visitors".to_string()]
    );
    assert_eq!(b.cell_count("r1"), 2);
    assert_eq!(b.cell_total(), 3);

    assert_eq!(b.count("r2", "visitors"), Some(3));
    assert_eq!(b.count("r2", "nope"), None);

    let rs = b.row_snapshot("r1").expect("row snapshot");
    assert_eq!(rs.get("clicks"), Some(2));
    assert_eq!(rs.get("visitors"), Some(1));
    assert!(b.row_snapshot("missing").is_none());

    let ss = b.board_snapshot();
    assert_eq!(ss.row_count(), 2);
    assert_eq!(ss.cell_total(), 3);
    assert_eq!(ss.row("r2").and_then(|r| r.get("visitors")), Some(3));
    Ok(())
}

#[test]
fn custom_row_type_is_pluggable() {
    use CardCube::Row;
    let b: Board<Row> = Board::new(Arc::new(Cube::new(6)));
    let c = b.get_cell("r", "c", true).expect("created");
    assert_eq!(c.precision(), 6);
    let row = Row::new();
    assert_eq!(row.cell_count(), 0);
}

#[test]
fn striped_board_behaves_the_same() {
    let cfg = CubeConfig::default().with_cell_lock_stripes(8);
    let b = Board::from_config(&cfg);
    assert_eq!(b.cell_lock_stripes(), 8);
    for i in 0..50u32 {
        b.push(&format!("row-{}", i % 5), &format!("cell-{}", i % 7), &i.to_le_bytes());
    }
    assert_eq!(b.row_count(), 5);
    let total: usize = b.row_names().iter().map(|r| b.cell_count(r)).sum();
    assert_eq!(total, b.cell_total());
}
