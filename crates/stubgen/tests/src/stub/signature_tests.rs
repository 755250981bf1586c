use super::*;

fn toks(source: &str) -> Vec<String> {
    crate::ast::tokens::lex(source)
}

#[test]
fn format_type_name_attaches_every_pointer_and_reference() {
    assert_eq!(format_type_name("const char *"), "const char*");
    assert_eq!(format_type_name("int **"), "int**");
    assert_eq!(format_type_name("const std::string &"), "const std::string&");
    assert_eq!(format_type_name("int *const *"), "int*const*");
    assert_eq!(format_type_name("Widget &&"), "Widget&&");
    assert_eq!(format_type_name("void (*)(int)"), "void (*)(int)");
    assert_eq!(format_type_name("unsigned int"), "unsigned int");
}

#[test]
fn strip_template_args_removes_first_balanced_group() {
    assert_eq!(strip_template_args("max<int>"), "max");
    assert_eq!(strip_template_args("make<std::vector<int>>"), "make");
    assert_eq!(strip_template_args("plain"), "plain");
    assert_eq!(strip_template_args("broken<int"), "broken<int");
}

#[test]
fn strip_template_args_keeps_operator_names() {
    assert_eq!(strip_template_args("operator<"), "operator<");
    assert_eq!(strip_template_args("operator<<"), "operator<<");
    assert_eq!(strip_template_args("operator->"), "operator->");
}

#[test]
fn qualifiers_after_parameter_list() {
    let quals = scan_qualifiers(&toks("int size(const char *name) const noexcept;"), "size");
    assert_eq!(quals, Qualifiers { constexpr: false, trailing: " const noexcept".to_string() });
}

#[test]
fn const_return_type_is_not_a_qualifier() {
    let quals = scan_qualifiers(&toks("const Widget &get(const Key &key);"), "get");
    assert_eq!(quals.trailing, "");
}

#[test]
fn noexcept_expression_and_ref_qualifiers_are_kept() {
    let quals = scan_qualifiers(&toks("void swap(Box &other) && noexcept(sizeof(T) > 4) override;"), "swap");
    assert_eq!(quals.trailing, " && noexcept(sizeof(T)>4)");
}

#[test]
fn scan_stops_at_pure_specifier_initializers_and_bodies() {
    assert_eq!(scan_qualifiers(&toks("virtual int area() const = 0;"), "area").trailing, " const");
    assert_eq!(scan_qualifiers(&toks("Widget() : size_(0) {}"), "Widget").trailing, "");
    assert_eq!(scan_qualifiers(&toks("int f() const { return g() const; }"), "f").trailing, " const");
    assert_eq!(scan_qualifiers(&toks("auto f() const -> int;"), "f").trailing, " const");
}

#[test]
fn constexpr_is_found_before_the_name() {
    let quals = scan_qualifiers(&toks("static constexpr int answer() noexcept;"), "answer");
    assert!(quals.constexpr);
    assert_eq!(quals.trailing, " noexcept");
}

#[test]
fn operator_call_parameter_list_is_found() {
    let quals = scan_qualifiers(&toks("bool operator()(int value) const;"), "operator()");
    assert_eq!(quals.trailing, " const");
    let quals = scan_qualifiers(&toks("bool operator==(const Widget &other) const;"), "operator==");
    assert_eq!(quals.trailing, " const");
}

#[test]
fn destructor_parameter_list_is_found() {
    let quals = scan_qualifiers(&toks("virtual ~Widget() noexcept;"), "~Widget");
    assert_eq!(quals.trailing, " noexcept");
}

#[test]
fn join_tokens_separates_only_words() {
    assert_eq!(join_tokens(&toks("( sizeof ( T ) > 4 )")), "(sizeof(T)>4)");
    assert_eq!(join_tokens(&toks("(noexcept ( a . b ( ) ))")), "(noexcept(a.b()))");
    assert_eq!(join_tokens(&toks("unsigned int")), "unsigned int");
}

#[test]
fn conversion_operators_have_no_return_type() {
    assert!(is_conversion_name("operator bool"));
    assert!(is_conversion_name("operator std::string"));
    assert!(!is_conversion_name("operator new"));
    assert!(!is_conversion_name("operator=="));
    assert!(!is_conversion_name("operator()"));
}
