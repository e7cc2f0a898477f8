pub mod factory;
pub mod login;
pub mod password;
pub mod policy;
pub mod token_codec;

pub use factory::build_token_codec;
pub use login::AuthService;
pub use policy::{AccessPolicy, Decision};
pub use token_codec::{TokenCodec, TokenError};
