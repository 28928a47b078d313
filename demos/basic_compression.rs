use std::fs::File;

use huffpack::{CompressedData, HuffmanCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("huffpack-demo");
    std::fs::create_dir_all(&dir)?;
    let sample_path = dir.join("sample.txt");
    let packed_path = dir.join("sample.txt.huff");
    let restored_path = dir.join("decompressed.txt");

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";
    std::fs::write(&sample_path, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    HuffmanCodec::encode_from_file(File::open(&sample_path)?, File::create(&packed_path)?)?;

    let packed = std::fs::read(&packed_path)?;
    print!("{}", CompressedData::deserialize(&packed)?.summary());

    HuffmanCodec::decode_from_file(File::open(&packed_path)?, File::create(&restored_path)?)?;

    let restored = std::fs::read_to_string(&restored_path)?;
    if restored != sample_text {
        return Err("decompression verification failed".into());
    }
    println!("Decompression successful, data matches exactly.");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
