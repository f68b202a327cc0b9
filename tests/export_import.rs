use anyhow::{anyhow, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

use CardCube::{
    Board, Cell, CellFactory, CellOrigin, Cube, CubeConfig, PersistedBoard, PersistedCell,
    PersistedRow, Row, RowSnapshot, RowStore,
};

fn board() -> Board {
    Board::from_config(&CubeConfig::default().with_hll_precision(12))
}

fn names(v: Vec<String>) -> BTreeSet<String> {
    v.into_iter().collect()
}

#[test]
fn export_then_import_into_empty_board_roundtrips() -> Result<()> {
    let src = board();
    src.push("r1", "c1", b"a");
    src.push("r1", "c1", b"b");
    src.push("r1", "c2", b"a");
    src.push("r2", "c1", b"z");

    let data = src.export()?;
    assert_eq!(data.row_count(), 2);
    assert_eq!(data.cell_total(), 3);

    let dst = board();
    dst.import(&data)?;

    assert_eq!(dst.row_names(), src.row_names());
    for r in src.row_names() {
        assert_eq!(names(dst.cell_names(&r)), names(src.cell_names(&r)));
    }
    assert_eq!(dst.count("r1", "c1"), Some(2));
    assert_eq!(
        dst.get_cell("r2", "c1", false).map(|c| c.origin()),
        Some(CellOrigin::Deserialized)
    );
    assert_eq!(dst.board_snapshot(), src.board_snapshot());
    Ok(())
}

#[test]
fn import_is_additive() -> Result<()> {
    let b = board();
    b.push("r1", "c1", b"keep");
    b.push("r2", "c9", b"untouched");
    let r2_before = b.get_cell("r2", "c9", false).expect("present");

    let extra = Cube::new(12).generate_cell();
    extra.insert(b"new");
    let mut row = PersistedRow::default();
    row.cells
        .insert("c3".to_string(), PersistedCell::new(extra.to_bytes()?));
    let mut data = PersistedBoard::default();
    data.rows.insert("r1".to_string(), row);

    b.import(&data)?;

    assert_eq!(b.cell_names("r1"), vec!["c1".to_string(), "c3".to_string()]);
    assert_eq!(b.count("r1", "c1"), Some(1));
    assert_eq!(b.count("r1", "c3"), Some(1));
    let r2_after = b.get_cell("r2", "c9", false).expect("present");
    assert!(Arc::ptr_eq(&r2_before, &r2_after));
    Ok(())
}

#[test]
fn import_overwrites_named_cells() -> Result<()> {
    let b = board();
    for i in 0..10u32 {
        b.push("r", "c", &i.to_le_bytes());
    }
    let old = b.get_cell("r", "c", false).expect("present");

    let empty = Cube::new(12).generate_cell();
    let mut row = PersistedRow::default();
    row.cells
        .insert("c".to_string(), PersistedCell::new(empty.to_bytes()?));
    let mut data = PersistedBoard::default();
    data.rows.insert("r".to_string(), row);
    b.import(&data)?;

    let new = b.get_cell("r", "c", false).expect("present");
    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(new.count(), 0);
    Ok(())
}

#[test]
fn failed_import_keeps_what_was_merged() -> Result<()> {
    let b = board();
    let good = Cube::new(12).generate_cell().to_bytes()?;

    let mut data = PersistedBoard::default();
    let mut a = PersistedRow::default();
    a.cells.insert("ok".to_string(), PersistedCell::new(good));
    data.rows.insert("a".to_string(), a);
    let mut z = PersistedRow::default();
    z.cells
        .insert("bad".to_string(), PersistedCell::new(b"not a sketch".to_vec()));
    data.rows.insert("z".to_string(), z);

    let err = b.import(&data).expect_err("garbage payload must fail");
    assert!(format!("{:#}", err).contains("hll"), "unexpected error: {err:#}");

    // BTreeMap: "a" обработана раньше "z"
    assert_eq!(b.cell_names("a"), vec!["ok".to_string()]);
    assert!(b.get_cell("z", "bad", false).is_none());
    Ok(())
}

/// Строка, у которой export падает, если в ней есть ячейка "poison".
#[derive(Default)]
struct FlakyRow {
    inner: Row,
}

impl RowStore for FlakyRow {
    fn new() -> Self {
        Self::default()
    }
    fn get_cell(&self, name: &str) -> Option<Arc<Cell>> {
        self.inner.get_cell(name)
    }
    fn set_cell(&self, name: &str, cell: Arc<Cell>) {
        self.inner.set_cell(name, cell)
    }
    fn snapshot(&self) -> RowSnapshot {
        self.inner.snapshot()
    }
    fn cell_names(&self) -> Vec<String> {
        self.inner.cell_names()
    }
    fn cell_count(&self) -> usize {
        self.inner.cell_count()
    }
    fn export(&self) -> Result<PersistedRow> {
        if self.inner.get_cell("poison").is_some() {
            return Err(anyhow!("row export failed: poison cell"));
        }
        self.inner.export()
    }
}

#[test]
fn export_fails_fast_without_partial_result() {
    let b: Board<FlakyRow> = Board::new(Arc::new(Cube::new(8)));
    b.push("r1", "c", b"1");
    b.push("r2", "poison", b"2");
    b.push("r3", "c", b"3");

    let res = b.export();
    let err = res.expect_err("export must fail");
    assert!(err.to_string().contains("poison"));

    // После удаления проблемной строки экспорт снова проходит целиком
    assert!(b.drop_row("r2"));
    let data = b.export().expect("export ok");
    assert_eq!(
        data.rows.keys().cloned().collect::<Vec<_>>(),
        vec!["r1".to_string(), "r3".to_string()]
    );
}

#[test]
fn persisted_board_json_uses_base64_payload() -> Result<()> {
    let b = board();
    b.push("r", "c", b"v");
    let data = b.export()?;

    let text = serde_json::to_string(&data)?;
    assert!(text.contains("\"payload\":\"SExMMQ"), "payload must be base64: {text:.80}");

    let back: PersistedBoard = serde_json::from_str(&text)?;
    assert_eq!(back, data);
    Ok(())
}
