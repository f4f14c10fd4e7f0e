//! Known-answer vectors for the Ed25519 signer (RFC 8032, section 7.1).
//!
//! These pin the byte layout of packed keys and `R8 || S` signatures so that
//! off-chain signatures stay bit-compatible with the circuit.

/// A known-answer test vector.
pub struct SignerTestVector {
    pub name: &'static str,
    pub private_key_hex: &'static str,
    pub public_key_hex: &'static str,
    pub message_hex: &'static str,
    pub signature_hex: &'static str,
}

/// ⚠️ WARNING: DO NOT USE IN PRODUCTION ⚠️
///
/// These keys are publicly known.
pub fn get_test_vectors() -> Vec<SignerTestVector> {
    vec![
        SignerTestVector {
            name: "rfc8032_test_1_empty_message",
            private_key_hex: "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
            public_key_hex: "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
            message_hex: "",
            signature_hex: "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
        },
        SignerTestVector {
            name: "rfc8032_test_2_one_byte",
            private_key_hex: "4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb",
            public_key_hex: "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c",
            message_hex: "72",
            signature_hex: "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SignatureCodec;
    use crate::ed25519::Ed25519Signer;
    use crate::keys::PrivateKey;
    use crate::signer::Signer;

    fn key_bytes(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_known_public_keys() {
        let signer = Ed25519Signer::new();
        for vector in get_test_vectors() {
            let private_key = PrivateKey::from_bytes(&key_bytes(vector.private_key_hex));
            let public_key = signer.derive_public_key(&private_key).unwrap();
            assert_eq!(
                hex::encode(public_key.to_bytes()),
                vector.public_key_hex,
                "public key mismatch for {}",
                vector.name
            );
        }
    }

    #[test]
    fn test_known_signatures() {
        let signer = Ed25519Signer::new();
        for vector in get_test_vectors() {
            let private_key = PrivateKey::from_bytes(&key_bytes(vector.private_key_hex));
            let message = hex::decode(vector.message_hex).unwrap();

            let signature = signer.sign(&message, &private_key).unwrap();
            let packed = SignatureCodec::pack(&signature);
            assert_eq!(
                hex::encode(packed),
                vector.signature_hex,
                "signature mismatch for {}",
                vector.name
            );
            assert_eq!(hex::encode(signature.r8), &vector.signature_hex[..64]);
            assert_eq!(hex::encode(signature.s), &vector.signature_hex[64..]);

            let point = signer.unpack_point(&key_bytes(vector.public_key_hex)).unwrap();
            assert!(signer.verify(&message, &signature, &point).unwrap());
        }
    }
}
