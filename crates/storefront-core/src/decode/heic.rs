//! HEIC/HEIF detection.
//!
//! iPhones upload HEIC by default. The `image` crate has no HEVC decoder, so
//! these files are recognized up front and rejected with
//! [`DecodeError::UnsupportedFormat`](super::DecodeError::UnsupportedFormat);
//! the browser glue converts them to JPEG before calling the compressor.

/// ISO-BMFF brands used by HEIC/HEIF stills and sequences.
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// MIME types browsers report for HEIC/HEIF files.
const HEIF_MIME_TYPES: &[&str] = &[
    "image/heic",
    "image/heif",
    "image/heic-sequence",
    "image/heif-sequence",
];

/// Check whether the bytes start with an ISO-BMFF `ftyp` box naming a
/// HEIF brand, either as the major brand or a compatible brand.
pub fn is_heic(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }

    let box_size = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let box_end = box_size.min(bytes.len());

    let major = &bytes[8..12];
    if major == b"avif" || major == b"avis" {
        // AVIF lists mif1 as compatible but is AV1, not HEVC.
        return false;
    }
    if is_heif_brand(major) {
        return true;
    }

    // Compatible brands follow the major brand and minor version.
    if box_end <= 16 {
        return false;
    }
    bytes[16..box_end].chunks_exact(4).any(is_heif_brand)
}

/// Check a declared MIME type for HEIC/HEIF. Case-insensitive.
pub fn is_heic_mime(mime_type: &str) -> bool {
    let mime = mime_type.trim();
    HEIF_MIME_TYPES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(mime))
}

fn is_heif_brand(brand: &[u8]) -> bool {
    HEIF_BRANDS.iter().any(|b| b.as_slice() == brand)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftyp(major: &[u8; 4], compatible: &[&[u8; 4]]) -> Vec<u8> {
        let size = 16 + compatible.len() * 4;
        let mut bytes = Vec::with_capacity(size + 8);
        bytes.extend_from_slice(&(size as u32).to_be_bytes());
        bytes.extend_from_slice(b"ftyp");
        bytes.extend_from_slice(major);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        for brand in compatible {
            bytes.extend_from_slice(*brand);
        }
        // Trailing box header that must not be scanned as a brand.
        bytes.extend_from_slice(&[0, 0, 0, 8]);
        bytes.extend_from_slice(b"heic");
        bytes
    }

    #[test]
    fn test_major_brand_heic() {
        assert!(is_heic(&ftyp(b"heic", &[])));
        assert!(is_heic(&ftyp(b"mif1", &[])));
    }

    #[test]
    fn test_compatible_brand_heic() {
        assert!(is_heic(&ftyp(b"abcd", &[b"isom", b"heix"])));
    }

    #[test]
    fn test_mp4_is_not_heic() {
        assert!(!is_heic(&ftyp(b"isom", &[b"iso2", b"mp41"])));
    }

    #[test]
    fn test_brand_outside_ftyp_box_ignored() {
        // The "heic" after the box boundary belongs to the next box.
        assert!(!is_heic(&ftyp(b"abcd", &[b"mif2"])));
    }

    #[test]
    fn test_avif_is_not_heic() {
        assert!(!is_heic(&ftyp(b"avif", &[b"mif1", b"miaf"])));
    }

    #[test]
    fn test_short_and_unrelated_input() {
        assert!(!is_heic(&[]));
        assert!(!is_heic(b"ftypheic"));
        assert!(!is_heic(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_heic_mime() {
        assert!(is_heic_mime("image/heic"));
        assert!(is_heic_mime("Image/HEIF "));
        assert!(!is_heic_mime("image/jpeg"));
        assert!(!is_heic_mime(""));
    }
}
