/// One login session. Rows are never deleted; logout flips `is_active`
/// (soft revocation). A session is usable while it is active and unexpired.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub is_active: bool,
}

impl Session {
    pub fn is_usable(&self, now: i64) -> bool {
        self.is_active && now < self.expires_at
    }
}
