//! Quantization codecs which pack numeric and geometric values into
//! as few bits as their range and precision allow.
//!
//! Every packer is configured once with the range of values it has to
//! represent and derives a fixed bit width from that. Packers are
//! immutable after construction and can be shared freely between
//! threads; all state lives in the [`BitWriter`] and [`BitReader`]
//! they are handed.
//!
//! ```
//! use tessera_bit_buf::{BitReader, BitWriter};
//! use tessera_packers::{FloatPacker, Vec3, Vector3Packer};
//!
//! let speed = FloatPacker::new(100.0, 0.1)?;
//! let velocity = Vector3Packer::with_uniform_precision(Vec3::splat(50.0), 0.05)?;
//!
//! let mut writer = BitWriter::new(64);
//! speed.write(&mut writer, 42.5)?;
//! velocity.pack(&mut writer, Vec3::new(1.0, -2.0, 3.0))?;
//! assert_eq!(writer.bit_position() as u32, speed.bit_count() + velocity.bit_count());
//!
//! let bytes = writer.to_bytes();
//! let mut reader = BitReader::new(&bytes);
//! assert!((speed.read(&mut reader)? - 42.5).abs() <= 0.1);
//! assert!((velocity.unpack(&mut reader)?.y + 2.0).abs() <= 0.05);
//! # Ok::<(), tessera_packers::Error>(())
//! ```

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
pub use error::Error;

mod float;
pub use float::FloatPacker;

mod math;
pub use math::{Quaternion, Vec2, Vec3};

mod position;
pub use position::PositionPacker;

mod quaternion;
pub use quaternion::QuaternionPacker;

pub mod scale;

mod var_block;
pub use var_block::VariableBlockPacker;

mod var_int;
pub use var_int::VariableIntPacker;

mod vector;
pub use vector::{Vector2Packer, Vector3Packer};

#[doc(no_inline)]
pub use tessera_bit_buf::{BitReader, BitWriter};
