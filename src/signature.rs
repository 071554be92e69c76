//! Argument-signature fingerprints.
//!
//! Turns an ordered argument list into a fixed-width fingerprint for O(1)
//! dispatch-cache lookups. The fingerprint is a pure function of the
//! arguments' native *types*, never their values: two calls with the same
//! type sequence always produce the same hash, and different sequences
//! collide only with xxh64's probability.

use xxhash_rust::xxh64::xxh64;

use crate::value::Value;

/// Mixing constants separating the signature domain from other hash uses.
pub mod hash_constants {
    /// Chaining multiplier between argument positions.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for argument signatures; also the empty-signature value.
    pub const SIGNATURE: u64 = 0x6d0c1e8fb23a9457;

    /// Per-position mixing constants so argument order matters.
    pub const ARG_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// Fingerprint of the empty argument list.
pub const EMPTY_SIGNATURE: u64 = hash_constants::SIGNATURE;

/// Hash an ordered argument list into a 64-bit type fingerprint.
///
/// Positions are mixed with `wrapping_mul` so `(long, double)` and
/// `(double, long)` hash differently.
pub fn hash_signature(args: &[Value]) -> u64 {
    let mut hash = hash_constants::SIGNATURE;
    for (i, arg) in args.iter().enumerate() {
        let marker = hash_constants::ARG_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::ARG_MARKERS[0].wrapping_add(i as u64));
        let name = arg.native_type_name();
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ xxh64(name.as_bytes(), 0));
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signature_is_constant() {
        assert_eq!(hash_signature(&[]), EMPTY_SIGNATURE);
        assert_eq!(hash_signature(&[]), hash_signature(&[]));
    }

    #[test]
    fn same_types_same_hash() {
        let a = [Value::Int(1), Value::Float(2.0)];
        let b = [Value::Int(99), Value::Float(-7.5)];
        assert_eq!(hash_signature(&a), hash_signature(&b));
    }

    #[test]
    fn different_types_different_hash() {
        let ints = [Value::Int(1), Value::Int(2)];
        let mixed = [Value::Int(1), Value::Float(2.0)];
        let strings = [Value::Str("a".into()), Value::Str("b".into())];
        assert_ne!(hash_signature(&ints), hash_signature(&mixed));
        assert_ne!(hash_signature(&ints), hash_signature(&strings));
        assert_ne!(hash_signature(&mixed), hash_signature(&strings));
    }

    #[test]
    fn argument_order_matters() {
        let ab = [Value::Int(1), Value::Float(2.0)];
        let ba = [Value::Float(2.0), Value::Int(1)];
        assert_ne!(hash_signature(&ab), hash_signature(&ba));
    }

    #[test]
    fn arity_matters() {
        let one = [Value::Int(1)];
        let two = [Value::Int(1), Value::Int(1)];
        assert_ne!(hash_signature(&one), hash_signature(&two));
        assert_ne!(hash_signature(&one), EMPTY_SIGNATURE);
    }

    #[test]
    fn object_hash_uses_class_name() {
        let w = [Value::Object {
            class: "Widget".into(),
            instance: 1,
        }];
        let w2 = [Value::Object {
            class: "Widget".into(),
            instance: 2,
        }];
        let g = [Value::Object {
            class: "Gadget".into(),
            instance: 1,
        }];
        assert_eq!(hash_signature(&w), hash_signature(&w2));
        assert_ne!(hash_signature(&w), hash_signature(&g));
    }

    #[test]
    fn many_arguments_supported() {
        let args: Vec<Value> = (0..40).map(Value::Int).collect();
        // markers run out at 16; positions beyond must still be order-sensitive
        let mut swapped = args.clone();
        swapped[20] = Value::Float(0.0);
        assert_ne!(hash_signature(&args), hash_signature(&swapped));
    }
}
