use std::time::{SystemTime, UNIX_EPOCH};

/// Generates a random RFC 4122 version 4 identifier.
///
/// Falls back to clock-derived bytes when the OS entropy source is unavailable so that
/// step creation never fails.
pub fn generate_uuid_v4() -> String {
    let mut bytes = [0u8; 16];
    if getrandom::getrandom(&mut bytes).is_err() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        for (idx, b) in bytes.iter_mut().enumerate() {
            *b = ((now >> ((idx % 16) * 8)) & 0xFF) as u8;
        }
    }

    // Set version (4) and variant (RFC 4122).
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;

    let hex = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn uuid_has_version_and_variant_bits() {
        let id = generate_uuid_v4();
        assert_eq!(id.len(), 36);
        assert_eq!(&id[14..15], "4");
        assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"), "{id}");
    }

    #[test]
    fn uuids_do_not_repeat() {
        let ids: BTreeSet<_> = (0..256).map(|_| generate_uuid_v4()).collect();
        assert_eq!(ids.len(), 256);
    }
}
