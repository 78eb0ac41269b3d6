//! 服务端会话存储
//!
//! 会话令牌是 32 字节随机值的十六进制编码，对客户端完全不透明。
//! 内存中只保存令牌的 SHA-256 摘要，即使进程内存被导出也无法还原令牌。

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::user::Role;

/// 会话记录
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    /// 登录时的角色快照，管理操作仍需重新查询数据库确认
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// 会话管理器，按令牌摘要索引
pub struct SessionManager {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// 创建新会话，返回下发给客户端的原始令牌
    pub fn create(&self, user_id: Uuid, username: &str, role: Role) -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let now = Utc::now();
        let session = Session {
            user_id,
            username: username.to_string(),
            role,
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.sessions.insert(Self::hash_token(&token), session);
        token
    }

    /// 根据令牌查找会话，过期会话在此处顺带清除
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let key = Self::hash_token(token);
        let session = self.sessions.get(&key)?.clone();

        if session.is_expired() {
            self.sessions.remove(&key);
            return None;
        }

        Some(session)
    }

    /// 销毁会话，对不存在的令牌静默成功
    pub fn destroy(&self, token: &str) {
        self.sessions.remove(&Self::hash_token(token));
    }

    /// 销毁某用户的全部会话（停用账号时调用），返回清除数量
    pub fn destroy_user_sessions(&self, user_id: Uuid) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        before - self.sessions.len()
    }

    /// 清理所有过期会话，返回清除数量
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        before - self.sessions.len()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
