//! Implementation of the `chunkflow chunk` command.

use crate::chunker::{Chunker, char_len};
use crate::cli::ChunkArgs;
use crate::error::{FlowError, Result};
use crate::fs::atomic_write_file;

/// Execute the `chunkflow chunk` command.
pub fn cmd_chunk(args: ChunkArgs) -> Result<()> {
    let chunker = Chunker::new(args.budget)?;
    let text = std::fs::read_to_string(&args.document).map_err(|e| {
        FlowError::Io(format!(
            "failed to read document '{}': {}",
            args.document.display(),
            e
        ))
    })?;

    let chunking = chunker.chunk(&text);

    println!(
        "{}: {} chunk(s) at a budget of {} chars",
        args.document.display(),
        chunking.len(),
        chunker.budget()
    );
    for (i, chunk) in chunking.chunks.iter().enumerate() {
        let first_line = chunk.lines().next().unwrap_or_default();
        println!("  {:>3}. {:>7} chars  {}", i + 1, char_len(chunk), first_line);
    }
    for omitted in &chunking.omitted {
        tracing::warn!(
            section = %omitted.header,
            dropped_chars = omitted.dropped_chars,
            "section header exceeds chunk budget, content omitted"
        );
        println!(
            "warning: chunk {} replaces '{}' ({} chars omitted)",
            omitted.chunk_index + 1,
            omitted.header,
            omitted.dropped_chars
        );
    }

    if let Some(dir) = &args.out_dir {
        for (i, chunk) in chunking.chunks.iter().enumerate() {
            atomic_write_file(dir.join(format!("chunk_{:03}.md", i + 1)), chunk)?;
        }
        println!("Wrote {} file(s) to {}", chunking.len(), dir.display());
    }

    Ok(())
}
