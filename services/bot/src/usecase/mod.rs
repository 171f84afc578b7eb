pub mod codegen;
pub mod dialogue;
pub mod issue;
pub mod menu;
pub mod redeem;
pub mod session;
