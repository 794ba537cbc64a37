//! Known-answer tests for the passhash KDF primitives.

use passhash::crypto::{pbkdf2, scrypt, Algorithm};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// PBKDF2-HMAC-SHA1 (RFC 6070)
// ---------------------------------------------------------------------------

#[test]
fn pbkdf2_sha1_one_iteration() {
    let dk = pbkdf2(Algorithm::HmacSha1, b"password", b"salt", 1, 20).expect("derive");
    assert_eq!(hex(&dk), "0c60c80f961f0e71f3a9b524af6012062fe037a6");
}

#[test]
fn pbkdf2_sha1_two_iterations() {
    let dk = pbkdf2(Algorithm::HmacSha1, b"password", b"salt", 2, 20).expect("derive");
    assert_eq!(hex(&dk), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
}

#[test]
fn pbkdf2_sha1_4096_iterations() {
    let dk = pbkdf2(Algorithm::HmacSha1, b"password", b"salt", 4096, 20).expect("derive");
    assert_eq!(hex(&dk), "4b007901b765489abead49d926f721d065a429c1");
}

#[test]
fn pbkdf2_sha1_multi_block_output() {
    let dk = pbkdf2(
        Algorithm::HmacSha1,
        b"passwordPASSWORDpassword",
        b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
        4096,
        25,
    )
    .expect("derive");
    assert_eq!(hex(&dk), "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038");
}

// ---------------------------------------------------------------------------
// PBKDF2-HMAC-SHA256
// ---------------------------------------------------------------------------

#[test]
fn pbkdf2_sha256_one_iteration() {
    let dk = pbkdf2(Algorithm::HmacSha256, b"password", b"salt", 1, 32).expect("derive");
    assert_eq!(
        hex(&dk),
        "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
    );
}

#[test]
fn pbkdf2_is_deterministic() {
    let a = pbkdf2(Algorithm::HmacSha3_256, b"pw", b"salt", 50, 48).expect("derive 1");
    let b = pbkdf2(Algorithm::HmacSha3_256, b"pw", b"salt", 50, 48).expect("derive 2");
    assert_eq!(a, b, "same inputs must give the same key");
}

// ---------------------------------------------------------------------------
// scrypt (RFC 7914, section 12)
// ---------------------------------------------------------------------------

#[test]
fn scrypt_empty_password_and_salt() {
    let dk = scrypt(Algorithm::HmacSha256, b"", b"", 16, 1, 1, 64).expect("derive");
    assert_eq!(
        hex(&dk),
        concat!(
            "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442",
            "fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
        )
    );
}

#[test]
fn scrypt_password_nacl() {
    let dk = scrypt(Algorithm::HmacSha256, b"password", b"NaCl", 1024, 8, 16, 64).expect("derive");
    assert_eq!(
        hex(&dk),
        concat!(
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162",
            "2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640"
        )
    );
}

#[test]
fn scrypt_output_depends_on_every_cost_parameter() {
    let base = scrypt(Algorithm::HmacSha256, b"pw", b"salt", 16, 1, 1, 32).expect("base");
    let n = scrypt(Algorithm::HmacSha256, b"pw", b"salt", 32, 1, 1, 32).expect("n");
    let r = scrypt(Algorithm::HmacSha256, b"pw", b"salt", 16, 2, 1, 32).expect("r");
    let p = scrypt(Algorithm::HmacSha256, b"pw", b"salt", 16, 1, 2, 32).expect("p");
    let alg = scrypt(Algorithm::HmacSha512, b"pw", b"salt", 16, 1, 1, 32).expect("alg");

    for other in [&n, &r, &p, &alg] {
        assert_ne!(&base, other);
    }
}
