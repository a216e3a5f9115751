use aes::Aes256;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::RngCore as _;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot tokenize an empty identity.")]
	EmptyInput,
	#[error("Identity key material must be base64 for a 32-byte key and a 16-byte IV.")]
	InvalidKeyMaterial,
	#[error("Token encoding is invalid.")]
	InvalidEncoding,
	#[error("Token does not decrypt under this deployment's key.")]
	Decrypt,
	#[error("Decrypted identity is not valid UTF-8.")]
	InvalidUtf8,
}

/// Reversible obfuscation of an email into a URL-safe token.
///
/// Key and IV are fixed per deployment, so tokenization is deterministic and the
/// token doubles as a stable corpus-lookup key.
pub struct Tokenizer {
	key: [u8; 32],
	iv: [u8; 16],
}

impl Tokenizer {
	pub fn new(key: [u8; 32], iv: [u8; 16]) -> Self {
		Self { key, iv }
	}

	pub fn from_config(cfg: &ava_config::Identity) -> Result<Self> {
		let key = BASE64.decode(&cfg.key).map_err(|_| Error::InvalidKeyMaterial)?;
		let iv = BASE64.decode(&cfg.iv).map_err(|_| Error::InvalidKeyMaterial)?;
		let key: [u8; 32] = key.try_into().map_err(|_| Error::InvalidKeyMaterial)?;
		let iv: [u8; 16] = iv.try_into().map_err(|_| Error::InvalidKeyMaterial)?;

		Ok(Self::new(key, iv))
	}

	/// AES-256-CBC, then base64, then percent-encoding for URL embedding.
	pub fn tokenize(&self, email: &str) -> Result<String> {
		if email.is_empty() {
			return Err(Error::EmptyInput);
		}

		let cipher = Aes256CbcEnc::new(&self.key.into(), &self.iv.into());
		let sealed = cipher.encrypt_padded_vec_mut::<Pkcs7>(email.as_bytes());

		Ok(urlencoding::encode(&BASE64.encode(sealed)).into_owned())
	}

	/// Rejects tokens that were not produced under the matching key/IV pair.
	pub fn detokenize(&self, token: &str) -> Result<String> {
		let unescaped = urlencoding::decode(token).map_err(|_| Error::InvalidEncoding)?;
		let sealed = BASE64.decode(unescaped.as_bytes()).map_err(|_| Error::InvalidEncoding)?;
		let cipher = Aes256CbcDec::new(&self.key.into(), &self.iv.into());
		let plain = cipher.decrypt_padded_vec_mut::<Pkcs7>(&sealed).map_err(|_| Error::Decrypt)?;

		String::from_utf8(plain).map_err(|_| Error::InvalidUtf8)
	}
}

/// Fresh base64-encoded key/IV material for a new deployment.
pub fn generate_material() -> (String, String) {
	let mut key = [0_u8; 32];
	let mut iv = [0_u8; 16];

	rand::rngs::OsRng.fill_bytes(&mut key);
	rand::rngs::OsRng.fill_bytes(&mut iv);

	(BASE64.encode(key), BASE64.encode(iv))
}
