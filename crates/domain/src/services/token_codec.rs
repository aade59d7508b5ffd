//! 链接令牌编解码服务
//!
//! 把 (接收人ID, 活动ID) 封装成一个不透明、防篡改的承载令牌，嵌入外发链接。
//! 落地端只凭令牌本身即可还原这一对ID，服务端不维护已签发令牌的登记表。

use data_encoding::BASE64URL_NOPAD;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

use crate::errors::{DomainError, DomainResult, TokenDecodeError};

/// 对称密钥长度（ChaCha20-Poly1305）
const KEY_LEN: usize = 32;

/// 承载令牌编解码器
///
/// 令牌格式: base64url( nonce || ciphertext || tag )，明文为 `"{recipient}|{campaign}"`。
/// 每次编码使用新的随机 nonce，同一对ID两次编码得到不同的令牌。
/// 密钥在进程生命周期内不轮换；换钥会使所有在途令牌失效。
pub struct TokenCodec {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl TokenCodec {
    /// 从 base64url 编码的密钥构建编解码器。
    ///
    /// 密钥缺失、无法解码或长度不足都是启动期致命错误，不是逐次调用的错误。
    pub fn new(secret_key: &str) -> DomainResult<Self> {
        let trimmed = secret_key.trim().trim_end_matches('=');
        if trimmed.is_empty() {
            return Err(DomainError::invalid_key_material("secret key is empty"));
        }
        let key_bytes = BASE64URL_NOPAD
            .decode(trimmed.as_bytes())
            .map_err(|_| DomainError::invalid_key_material("secret key is not valid base64url"))?;
        if key_bytes.len() != KEY_LEN {
            return Err(DomainError::invalid_key_material(format!(
                "secret key must be {} bytes, got {}",
                KEY_LEN,
                key_bytes.len()
            )));
        }
        let unbound = UnboundKey::new(&CHACHA20_POLY1305, &key_bytes)
            .map_err(|_| DomainError::invalid_key_material("key rejected by cipher"))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// 编码 (接收人, 活动) 为承载令牌
    pub fn encode(&self, recipient_id: i64, campaign_id: i64) -> DomainResult<String> {
        self.seal(format!("{}|{}", recipient_id, campaign_id).into_bytes())
    }

    /// 解码承载令牌，还原 (接收人, 活动)
    pub fn decode(&self, token: &str) -> Result<(i64, i64), TokenDecodeError> {
        let raw = BASE64URL_NOPAD
            .decode(token.trim().as_bytes())
            .map_err(|_| TokenDecodeError::Malformed)?;
        if raw.len() < NONCE_LEN + CHACHA20_POLY1305.tag_len() {
            return Err(TokenDecodeError::Malformed);
        }

        let (nonce_bytes, sealed) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| TokenDecodeError::Malformed)?;
        let mut buf = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut buf)
            .map_err(|_| TokenDecodeError::AuthenticationFailed)?;

        let text = std::str::from_utf8(plaintext).map_err(|_| TokenDecodeError::PayloadInvalid)?;
        let (recipient, campaign) = text
            .split_once('|')
            .ok_or(TokenDecodeError::PayloadInvalid)?;
        let recipient_id = recipient
            .parse::<i64>()
            .map_err(|_| TokenDecodeError::PayloadInvalid)?;
        let campaign_id = campaign
            .parse::<i64>()
            .map_err(|_| TokenDecodeError::PayloadInvalid)?;
        Ok((recipient_id, campaign_id))
    }

    fn seal(&self, mut plaintext: Vec<u8>) -> DomainResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| DomainError::token_sealing("nonce generation failed"))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut plaintext)
            .map_err(|_| DomainError::token_sealing("cipher rejected payload"))?;

        let mut out = Vec::with_capacity(NONCE_LEN + plaintext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&plaintext);
        Ok(BASE64URL_NOPAD.encode(&out))
    }
}
