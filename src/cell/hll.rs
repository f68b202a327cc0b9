//! cell/hll - HyperLogLog sketch с однобайтовыми регистрами.
//!
//! Формат payload (LE не нужен, все поля однобайтовые):
//!   [magic4="HLL1"][precision u8][hash_kind u8][registers: 1 << precision bytes]
//!
//! Оценка: классический HLL (alpha_m * m^2 / sum 2^-r) с linear counting
//! для малых кардинальностей. Коррекция больших диапазонов не нужна: хеш 64-битный.

use anyhow::{anyhow, Result};

use crate::consts::{HLL_HDR_SIZE, HLL_MAGIC, HLL_MAX_PRECISION, HLL_MIN_PRECISION};
use crate::hash::{hash64, HashKind, HASH_KIND_DEFAULT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperLogLog {
    precision: u8,
    hash_kind: HashKind,
    registers: Vec<u8>,
}

impl HyperLogLog {
    /// Новый пустой скетч. Точность вне 4..=18 - ошибка.
    pub fn new(precision: u8) -> Result<Self> {
        if !(HLL_MIN_PRECISION..=HLL_MAX_PRECISION).contains(&precision) {
            return Err(anyhow!(
                "hll: precision {} out of range {}..={}",
                precision,
                HLL_MIN_PRECISION,
                HLL_MAX_PRECISION
            ));
        }
        Ok(Self {
            precision,
            hash_kind: HASH_KIND_DEFAULT,
            registers: vec![0u8; 1usize << precision],
        })
    }

    /// Пустой скетч; точность зажимается в 4..=18.
    pub fn with_clamped_precision(precision: u8) -> Self {
        let precision = precision.clamp(HLL_MIN_PRECISION, HLL_MAX_PRECISION);
        Self {
            precision,
            hash_kind: HASH_KIND_DEFAULT,
            registers: vec![0u8; 1usize << precision],
        }
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    #[inline]
    pub fn hash_kind(&self) -> HashKind {
        self.hash_kind
    }

    #[inline]
    fn m(&self) -> usize {
        self.registers.len()
    }

    pub fn insert(&mut self, data: &[u8]) {
        let h = hash64(self.hash_kind, data);
        self.insert_hash(h);
    }

    /// Вставка уже посчитанного 64-битного хеша.
    pub fn insert_hash(&mut self, h: u64) {
        let p = self.precision as u32;
        let idx = (h >> (64 - p)) as usize;
        let w = h << p;
        // ранг первого единичного бита в оставшихся 64-p битах
        let max_rank = (64 - p + 1) as u8;
        let rank = if w == 0 {
            max_rank
        } else {
            (w.leading_zeros() as u8 + 1).min(max_rank)
        };
        if self.registers[idx] < rank {
            self.registers[idx] = rank;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Оценка кардинальности.
    pub fn estimate(&self) -> u64 {
        let m = self.m() as f64;
        let alpha = match self.m() {
            16 => 0.673,
            32 => 0.697,
            64 => 0.709,
            _ => 0.7213 / (1.0 + 1.079 / m),
        };

        let mut sum = 0.0f64;
        let mut zeros = 0usize;
        for &r in &self.registers {
            sum += 1.0 / ((1u64 << r) as f64);
            if r == 0 {
                zeros += 1;
            }
        }

        let raw = alpha * m * m / sum;
        let est = if raw <= 2.5 * m && zeros > 0 {
            m * (m / zeros as f64).ln()
        } else {
            raw
        };
        est.round() as u64
    }

    /// Объединение (поэлементный max). Требует одинаковой точности и hash kind.
    pub fn merge(&mut self, other: &HyperLogLog) -> Result<()> {
        if self.precision != other.precision {
            return Err(anyhow!(
                "hll: cannot merge precision {} into {}",
                other.precision,
                self.precision
            ));
        }
        if self.hash_kind != other.hash_kind {
            return Err(anyhow!(
                "hll: cannot merge hash kind {} into {}",
                other.hash_kind,
                self.hash_kind
            ));
        }
        for (dst, &src) in self.registers.iter_mut().zip(other.registers.iter()) {
            if *dst < src {
                *dst = src;
            }
        }
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        HLL_HDR_SIZE + self.m()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(HLL_MAGIC);
        out.push(self.precision);
        out.push(self.hash_kind.to_u8());
        out.extend_from_slice(&self.registers);
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HLL_HDR_SIZE {
            return Err(anyhow!("hll: payload too short ({} bytes)", buf.len()));
        }
        if &buf[..4] != HLL_MAGIC {
            return Err(anyhow!("hll: bad magic"));
        }
        let precision = buf[4];
        if !(HLL_MIN_PRECISION..=HLL_MAX_PRECISION).contains(&precision) {
            return Err(anyhow!("hll: precision {} out of range", precision));
        }
        let hash_kind = HashKind::from_u8(buf[5])
            .ok_or_else(|| anyhow!("hll: unknown hash kind {}", buf[5]))?;
        let m = 1usize << precision;
        let regs = &buf[HLL_HDR_SIZE..];
        if regs.len() != m {
            return Err(anyhow!(
                "hll: register block is {} bytes, expected {}",
                regs.len(),
                m
            ));
        }
        let max_rank = 64 - precision + 1;
        if let Some(bad) = regs.iter().find(|&&r| r > max_rank) {
            return Err(anyhow!("hll: register value {} exceeds {}", bad, max_rank));
        }
        Ok(Self {
            precision,
            hash_kind,
            registers: regs.to_vec(),
        })
    }
}
