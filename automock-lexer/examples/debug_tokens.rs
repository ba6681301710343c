use automock_lexer::Lexer;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let input = match args.get(1) {
        Some(arg) => arg.as_str(),
        None => "type Store interface {\n\tGet(key string) (*Item, error)\n}\n",
    };

    println!("Tokenizing: {:?}", input);
    println!();

    for (count, result) in Lexer::new(input).enumerate() {
        match result {
            Ok(token_span) => {
                println!(
                    "Token {}: {:?} at {:?}",
                    count + 1,
                    token_span.token,
                    token_span.span
                );
                println!("  Text: {:?}", &input[token_span.span.clone()]);
            }
            Err(e) => {
                println!("Error: {}", e);
                break;
            }
        }
    }
}
