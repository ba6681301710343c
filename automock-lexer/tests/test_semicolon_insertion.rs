use automock_lexer::{Lexer, Token};

#[test]
fn test_interface_method_lines_are_terminated() {
    let source = "type Store interface {\n\tGet(key string) error\n\tClose()\n}\n";
    let tokens: Vec<_> = Lexer::new(source).map(|r| r.unwrap().token).collect();

    let semicolons = tokens.iter().filter(|t| **t == Token::Semicolon).count();
    // After `error`, after `)` of Close(), after the closing brace
    assert_eq!(semicolons, 3);
    assert_eq!(tokens[0], Token::Type);
    assert_eq!(tokens[3], Token::LBrace);
    assert_eq!(tokens.last(), Some(&Token::Semicolon));
}

#[test]
fn test_multiline_block_comment_acts_as_newline() {
    let source = "x /* one\ntwo */ y";
    let tokens: Vec<_> = Lexer::new(source).map(|r| r.unwrap().token).collect();

    assert_eq!(
        tokens,
        vec![
            Token::Ident("x".to_string()),
            Token::Semicolon,
            Token::Ident("y".to_string()),
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_function_body_tokens_lex() {
    let source = r#"func (s *store) Get(k string) (v int, err error) {
	if x := s.m[k]; x != nil && !done {
		v <<= 2
		ch <- 'a'
	}
	return v, nil
}"#;
    let result: Result<Vec<_>, _> = Lexer::new(source).collect();
    assert!(result.is_ok(), "unexpected lex error: {:?}", result.err());
}

#[test]
fn test_spans_point_into_source() {
    let source = "package mocks";
    let spans: Vec<_> = Lexer::new(source).map(|r| r.unwrap()).collect();

    assert_eq!(&source[spans[0].span.clone()], "package");
    assert_eq!(&source[spans[1].span.clone()], "mocks");
    // Implicit semicolon at end of input is zero-width
    assert_eq!(spans[2].span, source.len()..source.len());
}
