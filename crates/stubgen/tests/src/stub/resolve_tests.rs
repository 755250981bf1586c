use super::*;

#[test]
fn function_name_column_points_at_last_name_character() {
    //                 123456789
    let line = "    void resize(int width, int height);";
    assert_eq!(find_function_name_column(line), Some(15));
}

#[test]
fn function_name_column_skips_space_before_paren() {
    let line = "int count (int x);";
    assert_eq!(find_function_name_column(line), Some(9));
}

#[test]
fn function_name_column_balances_nested_parens_and_bodies() {
    let line = "void apply(void (*fn)(int), int n) { run(fn); }";
    assert_eq!(find_function_name_column(line), Some(10));
}

#[test]
fn function_name_column_for_operator_call_lands_inside_declaration() {
    let line = "bool operator()(int v) const;";
    assert_eq!(find_function_name_column(line), Some(15));
}

#[test]
fn function_name_column_needs_a_balanced_parameter_list() {
    assert_eq!(find_function_name_column("int value;"), None);
    assert_eq!(find_function_name_column("    int b) const;"), None);
    assert_eq!(find_function_name_column("void f(int a,"), None);
    assert_eq!(find_function_name_column("(int x)"), None);
    assert_eq!(find_function_name_column(""), None);
}

#[test]
fn field_name_column_is_first_identifier_character() {
    assert_eq!(find_field_name_column("    int m_count;"), Some(5));
    assert_eq!(find_field_name_column("\t_value = 0;"), Some(2));
    assert_eq!(find_field_name_column("   ;"), None);
}
