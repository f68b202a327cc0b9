#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod config;
pub mod metrics;
pub mod hash;
pub mod lock;

// Ячейки и фабрика
pub mod cell;   // src/cell/{mod,hll}.rs
pub mod cube;

// Доска
pub mod row;
pub mod snapshot;
pub mod board;

// Дамп/загрузка
pub mod persist; // src/persist/{mod,codec,file}.rs

// Удобные реэкспорты
pub use board::Board;
pub use cell::{Cell, CellOrigin, HyperLogLog};
pub use config::{CubeConfig, CubeConfigBuilder};
pub use cube::{CellFactory, Cube};
pub use persist::{PersistedBoard, PersistedCell, PersistedRow};
pub use row::{Row, RowStore};
pub use snapshot::{BoardSnapshot, RowSnapshot};
