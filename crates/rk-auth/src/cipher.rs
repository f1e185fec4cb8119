//! RC4 stream cipher used to obscure credentials in transit.
//!
//! This is a legacy obfuscation layer expected by Rocker servers that share a
//! secret with their clients. It is not a security boundary.

use crate::error::{Error, ErrorKind, Result};

/// RC4 keystream generator.
#[derive(Clone)]
pub struct Rc4 {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl std::fmt::Debug for Rc4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rc4").finish_non_exhaustive()
    }
}

impl Rc4 {
    /// Run key scheduling for `key`.
    ///
    /// Returns [`ErrorKind::EmptyKey`] for a zero-length key.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::new(ErrorKind::EmptyKey));
        }

        let mut state = [0u8; 256];
        for (slot, value) in state.iter_mut().zip(0u8..=255) {
            *slot = value;
        }

        let mut j: u8 = 0;
        for i in 0..256 {
            j = j
                .wrapping_add(state[i])
                .wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        Ok(Self { state, i: 0, j: 0 })
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.state[self.i as usize]);
        self.state.swap(self.i as usize, self.j as usize);
        let idx = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
        self.state[idx as usize]
    }

    /// XOR `data` in place with the next bytes of the keystream.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data {
            *byte ^= self.next_byte();
        }
    }
}

/// Encrypt `plaintext` under `key`. The output has the same length as the input.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut out = plaintext.to_vec();
    Rc4::new(key)?.apply_keystream(&mut out);
    Ok(out)
}

/// Decrypt `ciphertext` under `key`. Same operation as [`encrypt`].
pub fn decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    encrypt(key, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }

    #[test]
    fn test_published_vectors() {
        assert_eq!(
            hex(&encrypt(b"Key", b"Plaintext").unwrap()),
            "BBF316E8D940AF0AD3"
        );
        assert_eq!(hex(&encrypt(b"Wiki", b"pedia").unwrap()), "1021BF0420");
        assert_eq!(
            hex(&encrypt(b"Secret", b"Attack at dawn").unwrap()),
            "45A01F645FC35B383552544B9BF5"
        );
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let err = encrypt(b"", b"anything").unwrap_err();
        assert!(err.is_empty_key());
        assert!(Rc4::new(&[]).is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        assert!(encrypt(b"k", b"").unwrap().is_empty());
    }

    #[test]
    fn test_keystream_continues_across_calls() {
        let mut split = Rc4::new(b"Key").unwrap();
        let mut first = *b"Plain";
        let mut second = *b"text";
        split.apply_keystream(&mut first);
        split.apply_keystream(&mut second);

        let whole = encrypt(b"Key", b"Plaintext").unwrap();
        assert_eq!([&first[..], &second[..]].concat(), whole);
    }

    #[test]
    fn test_debug_hides_state() {
        let rc4 = Rc4::new(b"secret").unwrap();
        assert_eq!(format!("{:?}", rc4), "Rc4 { .. }");
    }

    proptest! {
        #[test]
        fn prop_decrypt_inverts_encrypt(
            key in proptest::collection::vec(any::<u8>(), 1..64),
            plain in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let sealed = encrypt(&key, &plain).unwrap();
            prop_assert_eq!(sealed.len(), plain.len());
            prop_assert_eq!(decrypt(&key, &sealed).unwrap(), plain);
        }
    }
}
