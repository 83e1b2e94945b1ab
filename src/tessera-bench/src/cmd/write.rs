use std::hint::black_box;

use clap::Args;
use tessera_bit_buf::{BitWriter, WriterOptions};

use super::Command;
use crate::stats::measure;

// Upper bound for the number of writes in a single batch.
const MAX_WRITES_PER_BATCH: usize = 300;

/// Times batches of `BitWriter::write` calls.
///
/// Every batch writes as many values of one width as fit into the
/// smallest buffer, then resets the writer.
#[derive(Debug, Args)]
pub struct Write {
    /// Buffer sizes in bytes to benchmark, comma separated.
    #[clap(short, long, value_delimiter = ',', default_value = "1200")]
    buffer_sizes: Vec<usize>,

    /// Bit widths of individual writes, comma separated.
    ///
    /// Every width from 1 to 32 is measured when none are given.
    #[clap(short, long, value_delimiter = ',')]
    write_sizes: Vec<u32>,

    /// Number of timed samples per configuration.
    #[clap(short, long, default_value_t = 100)]
    samples: usize,

    /// Number of batches per sample.
    #[clap(short, long, default_value_t = 1000)]
    iterations: usize,

    /// Let the writer grow instead of using a fixed buffer.
    #[clap(long)]
    resizable: bool,
}

impl Command for Write {
    fn handle(self) -> eyre::Result<()> {
        let write_sizes = if self.write_sizes.is_empty() {
            (1..=32).collect()
        } else {
            self.write_sizes
        };
        if let Some(bad) = write_sizes.iter().find(|&&bits| bits == 0 || bits > u64::BITS) {
            eyre::bail!("write size must be between 1 and 64 bits, got {bad}");
        }

        let Some(&smallest) = self.buffer_sizes.iter().min() else {
            eyre::bail!("at least one buffer size is required");
        };

        println!(
            "{:>12}{:>12}{:>10}{:>14}{:>14}{:>14}",
            "bufferSize", "writeSize", "writes", "mean (ns)", "min (ns)", "stddev"
        );
        for &buffer_size in &self.buffer_sizes {
            for &bits in &write_sizes {
                let count = MAX_WRITES_PER_BATCH.min(smallest * 8 / bits as usize);
                log::debug!("Timing {count} writes of {bits} bits into {buffer_size} bytes");

                let mut writer = BitWriter::with_options(WriterOptions {
                    min_byte_capacity: buffer_size,
                    allow_resize: self.resizable,
                    ..Default::default()
                });

                let summary = measure(self.samples, self.iterations, || {
                    for i in 0..count {
                        writer.write(i as u64, bits)?;
                    }
                    black_box(writer.bit_position());
                    writer.reset();

                    Ok::<_, tessera_bit_buf::Error>(())
                })?;

                if let Some(summary) = summary {
                    println!("{buffer_size:>12}{bits:>12}{count:>10}{summary}");
                }
            }
        }

        Ok(())
    }
}
