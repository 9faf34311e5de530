mod lexer;
mod printer;
mod reader;

pub use lexer::{tokenize, Token, TokenKind};
pub use printer::{print_program, print_sexpr};
pub use reader::{read_one, read_source};
