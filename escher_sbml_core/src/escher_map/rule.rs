//! Scan a gene reaction rule for the gene identifiers it mentions

/// Collect the gene identifiers of a rule such as `"(b0001 and b0002) or b0003"`, in order of
/// first appearance
pub(crate) fn rule_genes(rule: &str) -> Vec<String> {
    let mut scanner = RuleScanner::new(rule);
    scanner.scan_genes();
    scanner.genes
}

struct RuleScanner {
    source: Vec<char>,
    genes: Vec<String>,
    start: usize,
    current: usize,
}

impl RuleScanner {
    fn new(source: &str) -> Self {
        RuleScanner {
            source: source.chars().collect(),
            genes: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    fn scan_genes(&mut self) {
        while !self.is_at_end() {
            self.start = self.current;
            let c = self.advance();
            match c {
                '(' | ')' => {}
                c if c.is_whitespace() => {}
                _ => self.read_identifier(),
            }
        }
    }

    fn read_identifier(&mut self) {
        while !self.is_at_end() && RuleScanner::is_identifier(self.peek()) {
            self.advance();
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        match text.as_str() {
            "and" | "And" | "AND" | "or" | "Or" | "OR" | "not" | "Not" | "NOT" => {}
            gene => {
                if !self.genes.iter().any(|g| g == gene) {
                    self.genes.push(gene.to_string());
                }
            }
        }
    }

    fn is_identifier(c: char) -> bool {
        !(c.is_whitespace() || c == '(' || c == ')')
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.source[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}
