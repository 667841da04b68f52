use ragline_core::chunker::{chunk_corpus, chunk_text, normalize_whitespace, ChunkingConfig};
use ragline_core::error::Error;
use ragline_core::types::Document;

fn cfg(chunk_size: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig { chunk_size, overlap }
}

#[test]
fn window_advances_by_size_minus_overlap() {
    let chunks = chunk_text("ABCDEFGHIJ", &cfg(4, 1)).expect("chunk");
    assert_eq!(chunks, vec!["ABCD", "DEFG", "GHIJ"]);
}

#[test]
fn empty_text_yields_no_chunks() {
    let chunks = chunk_text("", &cfg(1000, 200)).expect("chunk");
    assert!(chunks.is_empty());

    // Whitespace-only input normalizes to nothing
    let chunks = chunk_text(" \n\t  ", &cfg(1000, 200)).expect("chunk");
    assert!(chunks.is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    let chunks = chunk_text("tiny", &cfg(1000, 200)).expect("chunk");
    assert_eq!(chunks, vec!["tiny"]);
}

#[test]
fn zero_overlap_chunks_are_contiguous_and_disjoint() {
    let chunks = chunk_text("ABCDEFGHIJ", &cfg(3, 0)).expect("chunk");
    assert_eq!(chunks, vec!["ABC", "DEF", "GHI", "J"]);
    assert_eq!(chunks.concat(), "ABCDEFGHIJ");
}

#[test]
fn overlap_stripped_concat_reconstructs_text() {
    let inputs = [
        ("the quick brown fox jumps over the lazy dog", 10, 3),
        ("ABCDEFGHIJ", 4, 1),
        ("short", 16, 4),
        ("héllo wörld — ünïcode text that spans a few windows", 7, 2),
    ];
    for (text, chunk_size, overlap) in inputs {
        let config = cfg(chunk_size, overlap);
        let chunks = chunk_text(text, &config).expect("chunk");
        let mut rebuilt: String = chunks.first().cloned().unwrap_or_default();
        for chunk in chunks.iter().skip(1) {
            rebuilt.extend(chunk.chars().skip(overlap));
        }
        assert_eq!(rebuilt, normalize_whitespace(text), "size={chunk_size} overlap={overlap}");
    }
}

#[test]
fn only_the_last_chunk_may_be_short() {
    let chunks = chunk_text("one two three four five six seven eight nine", &cfg(8, 2)).expect("chunk");
    assert!(!chunks.is_empty());
    for chunk in &chunks[..chunks.len() - 1] {
        assert_eq!(chunk.chars().count(), 8);
    }
    assert!(chunks.last().expect("last").chars().count() <= 8);
}

#[test]
fn adjacent_chunks_share_exactly_the_overlap() {
    let overlap = 3;
    let chunks = chunk_text("abcdefghijklmnopqrstuvwxyz", &cfg(10, overlap)).expect("chunk");
    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let next: Vec<char> = pair[1].chars().collect();
        assert_eq!(&prev[prev.len() - overlap..], &next[..overlap]);
    }
}

#[test]
fn normalization_collapses_whitespace() {
    let chunks = chunk_text("  a\n\nb\t\tc   d  ", &cfg(100, 10)).expect("chunk");
    assert_eq!(chunks, vec!["a b c d"]);
}

#[test]
fn overlap_not_below_chunk_size_is_a_config_error() {
    for (chunk_size, overlap) in [(4, 4), (4, 5), (0, 0)] {
        let err = chunk_text("anything", &cfg(chunk_size, overlap)).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfig(_)),
            "size={chunk_size} overlap={overlap} must be rejected"
        );
    }
    assert!(ChunkingConfig::new(200, 1000).is_err());
    assert!(ChunkingConfig::new(1000, 200).is_ok());
}

#[test]
fn corpus_indices_are_global_and_sequential() {
    let docs = vec![
        Document::new(Some("first".to_string()), "aaaa bbbb cccc"),
        Document::new(None, ""),
        Document::new(Some("third".to_string()), "dddd eeee"),
    ];
    let chunks = chunk_corpus(&docs, &cfg(5, 1)).expect("chunk corpus");
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i, "indices must match sequence positions");
    }
    assert_eq!(chunks.first().expect("first").title.as_deref(), Some("first"));
    assert_eq!(chunks.last().expect("last").title.as_deref(), Some("third"));
}
