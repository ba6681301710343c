use automock_parser::Parser;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let source = match args.get(1) {
        Some(arg) => arg.as_str(),
        None => "package store\n\ntype Store interface {\n\tGet(key string) ([]byte, error)\n}\n",
    };

    let mut parser = match Parser::new(source) {
        Ok(parser) => parser,
        Err(e) => {
            println!("Lex error: {}", e);
            return;
        }
    };

    println!("Total tokens: {}", parser.tokens().len());
    for (i, token_span) in parser.tokens().iter().enumerate() {
        println!("Token {}: {:?} at {:?}", i, token_span.token, token_span.span);
    }

    println!("\nParsing...");
    match parser.parse_file() {
        Ok(file) => println!("Parse successful: {} declarations", file.decls.len()),
        Err(e) => println!("Parse error: {}", e),
    }
}
