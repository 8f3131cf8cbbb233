//! Fixed-size secret containers.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A fixed-size secret buffer that is wiped on drop.
///
/// Used for chain codes and raw private scalars. Equality is constant-time and
/// `Debug` never prints the contents.
#[derive(Clone)]
pub struct SecretBytes<const N: usize>([u8; N]);

impl<const N: usize> Zeroize for SecretBytes<N> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> SecretBytes<N> {
    /// Create from a byte array
    #[inline]
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Copy from a slice, returning `None` if the length is not `N`.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; N] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    /// Get a reference to the inner bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for SecretBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> core::fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretBytes<{}>[REDACTED]", N)
    }
}

impl<const N: usize> ConstantTimeEq for SecretBytes<N> {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

/// 32-byte secret (private scalar or chain code)
pub type Secret32 = SecretBytes<32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret32::new([0xab; 32]);
        let debug = format!("{:?}", secret);
        assert_eq!(debug, "SecretBytes<32>[REDACTED]");
        assert!(!debug.contains("ab"));
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(Secret32::from_slice(&[1u8; 32]).is_some());
        assert!(Secret32::from_slice(&[1u8; 31]).is_none());
        assert!(Secret32::from_slice(&[1u8; 33]).is_none());
    }

    #[test]
    fn test_equality() {
        let a = Secret32::new([7; 32]);
        let b = Secret32::from([7; 32]);
        let mut c = [7; 32];
        c[31] = 8;
        assert_eq!(a, b);
        assert_ne!(a, Secret32::new(c));
    }
}
