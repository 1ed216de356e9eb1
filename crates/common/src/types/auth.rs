use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST auth/login` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_shape() {
        let json = r#"{"access_token":"abc.def","token_type":"bearer","user_id":1,"email":"ops@example.com","full_name":"Ops","tenant_id":2}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "abc.def");
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.tenant_id, Some(2));
    }

    #[test]
    fn test_token_is_required() {
        assert!(serde_json::from_str::<LoginResponse>(r#"{"token_type":"bearer"}"#).is_err());
    }
}
