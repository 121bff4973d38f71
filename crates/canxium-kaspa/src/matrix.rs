//! The kHeavyHash matrix.
//!
//! A 64x64 matrix of 4-bit values is derived from the pre-PoW hash through
//! xoshiro256++ and regenerated until it has full rank. The rank check runs
//! Gaussian elimination over f64 with an epsilon of 1e-9, exactly as Kaspa's
//! reference implementations define it.

use crate::hashing::{DomainHash, PowHasher};

const MATRIX_SIZE: usize = 64;
const EPS: f64 = 1e-9;

/// xoshiro256++ seeded from a 32-byte hash, read as four little-endian words.
pub(crate) struct XoShiRo256PlusPlus {
    s0: u64,
    s1: u64,
    s2: u64,
    s3: u64,
}

impl XoShiRo256PlusPlus {
    pub(crate) fn new(seed: &DomainHash) -> Self {
        let bytes = seed.as_bytes();
        let word = |i: usize| u64::from_le_bytes(bytes[i * 8..(i + 1) * 8].try_into().unwrap());
        Self {
            s0: word(0),
            s1: word(1),
            s2: word(2),
            s3: word(3),
        }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let result = self
            .s0
            .wrapping_add(self.s3)
            .rotate_left(23)
            .wrapping_add(self.s0);
        let t = self.s1 << 17;
        self.s2 ^= self.s0;
        self.s3 ^= self.s1;
        self.s1 ^= self.s2;
        self.s0 ^= self.s3;
        self.s2 ^= t;
        self.s3 = self.s3.rotate_left(45);
        result
    }
}

/// The full-rank heavy-hash matrix for one header.
pub struct Matrix([[u16; MATRIX_SIZE]; MATRIX_SIZE]);

impl Matrix {
    /// Derive the matrix for a pre-PoW hash, retrying until full rank.
    pub fn generate(pre_pow_hash: &DomainHash) -> Self {
        let mut generator = XoShiRo256PlusPlus::new(pre_pow_hash);
        loop {
            let mut values = [[0u16; MATRIX_SIZE]; MATRIX_SIZE];
            for row in values.iter_mut() {
                for chunk in 0..MATRIX_SIZE / 16 {
                    let word = generator.next_u64();
                    for shift in 0..16 {
                        row[chunk * 16 + shift] = ((word >> (4 * shift)) & 0x0f) as u16;
                    }
                }
            }
            let matrix = Self(values);
            if matrix.rank() == MATRIX_SIZE {
                return matrix;
            }
        }
    }

    fn rank(&self) -> usize {
        let mut rows: Vec<[f64; MATRIX_SIZE]> = self
            .0
            .iter()
            .map(|row| {
                let mut out = [0f64; MATRIX_SIZE];
                for (dst, &src) in out.iter_mut().zip(row.iter()) {
                    *dst = f64::from(src);
                }
                out
            })
            .collect();

        let mut rank = 0;
        let mut row_selected = [false; MATRIX_SIZE];
        for i in 0..MATRIX_SIZE {
            let mut j = 0;
            while j < MATRIX_SIZE {
                if !row_selected[j] && rows[j][i].abs() > EPS {
                    break;
                }
                j += 1;
            }
            if j == MATRIX_SIZE {
                continue;
            }
            rank += 1;
            row_selected[j] = true;
            for p in i + 1..MATRIX_SIZE {
                rows[j][p] /= rows[j][i];
            }
            for k in 0..MATRIX_SIZE {
                if k != j && rows[k][i].abs() > EPS {
                    for p in i + 1..MATRIX_SIZE {
                        rows[k][p] -= rows[j][p] * rows[k][i];
                    }
                }
            }
        }
        rank
    }

    /// The heavy-hash transform: multiply the digest's nibble vector by the
    /// matrix, keep 4 bits per lane, fold back into the digest bytes and
    /// hash once more under the heavy-hash domain.
    pub fn heavy_hash(&self, hash: &DomainHash) -> DomainHash {
        let bytes = hash.as_bytes();

        let mut vector = [0u16; MATRIX_SIZE];
        for (i, &byte) in bytes.iter().enumerate() {
            vector[2 * i] = u16::from(byte >> 4);
            vector[2 * i + 1] = u16::from(byte & 0x0f);
        }

        // Entries and lanes are 4-bit, so a 64-term dot product peaks at
        // 64 * 225 and cannot overflow u16.
        let mut product = [0u16; MATRIX_SIZE];
        for (i, row) in self.0.iter().enumerate() {
            let mut sum = 0u16;
            for (j, &cell) in row.iter().enumerate() {
                sum += cell * vector[j];
            }
            product[i] = sum >> 10;
        }

        let mut folded = [0u8; 32];
        for (i, dst) in folded.iter_mut().enumerate() {
            *dst = bytes[i] ^ (((product[2 * i] as u8) << 4) | product[2 * i + 1] as u8);
        }

        let mut hasher = PowHasher::heavy();
        hasher.write(&folded);
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xoshiro_vector() {
        let mut seed = [0u8; 32];
        for (i, byte) in seed.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let mut rng = XoShiRo256PlusPlus::new(&DomainHash::new(seed));
        assert_eq!(rng.next_u64(), 0x171513110f151311);
        assert_eq!(rng.next_u64(), 0xa2209f1d9c1e9d1b);
        assert_eq!(rng.next_u64(), 0xe0d100f0a090c0b0);
        assert_eq!(rng.next_u64(), 0xf4601386bb253984);
    }

    #[test]
    fn test_heavy_hash_vector() {
        // End-to-end matrix vector: generate for a fixed pre-PoW hash and
        // transform a fixed digest.
        let matrix = Matrix::generate(&DomainHash::new([7u8; 32]));
        let out = matrix.heavy_hash(&DomainHash::new([9u8; 32]));
        assert_eq!(
            out.to_string(),
            "5298be9037ebb284ce809128dbb5d50442a720cf868e28fa5ca8a0931ab4cff3"
        );
    }

    #[test]
    fn test_generated_matrix_has_full_rank() {
        let matrix = Matrix::generate(&DomainHash::new([0xabu8; 32]));
        assert_eq!(matrix.rank(), MATRIX_SIZE);
    }

    #[test]
    fn test_heavy_hash_depends_on_input() {
        let matrix = Matrix::generate(&DomainHash::new([1u8; 32]));
        let a = matrix.heavy_hash(&DomainHash::new([2u8; 32]));
        let b = matrix.heavy_hash(&DomainHash::new([3u8; 32]));
        assert_ne!(a, b);
    }
}
