use std::hint::black_box;

use clap::{Args, ValueEnum};
use tessera_bit_buf::{BitReader, BitWriter};
use tessera_packers::{
    Error, FloatPacker, PositionPacker, Quaternion, QuaternionPacker, Vec3, VariableBlockPacker,
    VariableIntPacker, Vector3Packer,
};

use super::Command;
use crate::stats::measure;

/// Times encoding and decoding with the quantization packers.
#[derive(Debug, Args)]
pub struct Pack {
    /// The packers to benchmark; all of them when omitted.
    #[clap(value_enum)]
    packers: Vec<Packer>,

    /// Number of values coded per iteration.
    #[clap(short = 'n', long, default_value_t = 100)]
    values: usize,

    /// Number of timed samples per packer.
    #[clap(short, long, default_value_t = 100)]
    samples: usize,

    /// Number of iterations per sample.
    #[clap(short, long, default_value_t = 1000)]
    iterations: usize,
}

/// A packer to benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Packer {
    /// Symmetric floats, 100 units at 0.01 precision.
    Float,
    /// Three-axis vectors, 100 units at 0.01 precision.
    Vector,
    /// Positions in a 1000x200x1000 box at 0.05 precision.
    Position,
    /// Smallest-three rotations with 10 bits per element.
    Quaternion,
    /// Three-bucket integers sized for 64 and 4096.
    VarInt,
    /// Integers in chains of 8-bit blocks.
    VarBlock,
}

// Deterministic spread of values in [-1, 1].
fn unit(i: usize) -> f32 {
    ((i as f32 * 0.618_034).fract() * 2.0) - 1.0
}

fn unit_vec(i: usize, scale: Vec3) -> Vec3 {
    Vec3::new(unit(i) * scale.x, unit(i + 1) * scale.y, unit(i + 2) * scale.z)
}

/// One configured instance of every packer.
struct Codecs {
    float: FloatPacker,
    vector: Vector3Packer,
    position: PositionPacker,
    quaternion: QuaternionPacker,
    var_int: VariableIntPacker,
    var_block: VariableBlockPacker,
}

impl Codecs {
    fn new() -> Result<Self, Error> {
        Ok(Self {
            float: FloatPacker::new(100.0, 0.01)?,
            vector: Vector3Packer::with_uniform_precision(Vec3::splat(100.0), 0.01)?,
            position: PositionPacker::new(
                Vec3::new(-500.0, -100.0, -500.0),
                Vec3::new(500.0, 100.0, 500.0),
                0.05,
            )?,
            quaternion: QuaternionPacker::default(),
            var_int: VariableIntPacker::new(64, 4096)?,
            var_block: VariableBlockPacker::new(8)?,
        })
    }

    // Encodes the `i`-th sample value for `packer`.
    fn encode(&self, packer: Packer, writer: &mut BitWriter, i: usize) -> Result<(), Error> {
        match packer {
            Packer::Float => self.float.write(writer, unit(i) * 100.0),
            Packer::Vector => self.vector.pack(writer, unit_vec(i, Vec3::splat(100.0))),
            Packer::Position => self
                .position
                .pack(writer, unit_vec(i, Vec3::new(500.0, 100.0, 500.0))),
            Packer::Quaternion => {
                let q = Quaternion::from_axis_angle(unit_vec(i, Vec3::splat(1.0)), unit(i + 3) * 3.0);
                self.quaternion.pack(writer, q)
            }
            Packer::VarInt => self.var_int.pack(writer, (i * i) as u64),
            Packer::VarBlock => self.var_block.pack(writer, (i * i) as u64),
        }
    }

    fn decode(&self, packer: Packer, reader: &mut BitReader<'_>) -> Result<(), Error> {
        match packer {
            Packer::Float => {
                black_box(self.float.read(reader)?);
            }
            Packer::Vector => {
                black_box(self.vector.unpack(reader)?);
            }
            Packer::Position => {
                black_box(self.position.unpack(reader)?);
            }
            Packer::Quaternion => {
                black_box(self.quaternion.unpack(reader)?);
            }
            Packer::VarInt => {
                black_box(self.var_int.unpack(reader)?);
            }
            Packer::VarBlock => {
                black_box(self.var_block.unpack(reader)?);
            }
        }

        Ok(())
    }
}

impl Command for Pack {
    fn handle(self) -> eyre::Result<()> {
        let packers = if self.packers.is_empty() {
            Packer::value_variants().to_vec()
        } else {
            self.packers
        };

        println!(
            "{:<12}{:>8}{:>14}{:>14}{:>14}",
            "packer", "op", "mean (ns)", "min (ns)", "stddev"
        );
        let codecs = Codecs::new()?;
        for packer in packers {
            let name = format!("{packer:?}");

            let mut writer = BitWriter::resizable(1300);
            let values = self.values;

            let summary = measure(self.samples, self.iterations, || {
                writer.reset();
                (0..values).try_for_each(|i| codecs.encode(packer, &mut writer, i))
            })?;
            log::debug!("{name}: {} bits per {values} values", writer.bit_position());
            if let Some(summary) = summary {
                println!("{name:<12}{:>8}{summary}", "pack");
            }

            let bytes = writer.to_bytes();
            let summary = measure(self.samples, self.iterations, || {
                let mut reader = BitReader::new(&bytes);
                (0..values).try_for_each(|_| codecs.decode(packer, &mut reader))
            })?;
            if let Some(summary) = summary {
                println!("{name:<12}{:>8}{summary}", "unpack");
            }
        }

        Ok(())
    }
}
