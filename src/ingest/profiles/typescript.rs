//! TypeScript profile: the JavaScript rules plus namespaces, interfaces and
//! enums.

use crate::ingest::profile::{ImportConvention, LanguageProfile, ScopeMode};
use crate::ingest::Language;

use super::javascript::{rules, CONTINUATION, RESERVED};
use super::C_STYLE_COMMENTS;

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: "typescript",
        language: Language::TypeScript,
        extensions: &["ts", "tsx", "mts", "cts"],
        comments: C_STYLE_COMMENTS,
        string_quotes: &['"', '\'', '`'],
        scope_mode: ScopeMode::Braces,
        rules: rules(true),
        import_block: None,
        imports: ImportConvention::JsModule,
        resolve_extensions: &["ts", "tsx", "d.ts", "js", "jsx"],
        reserved: RESERVED,
        continuation_prefixes: CONTINUATION,
        block_openers: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profiles::test_support::{bases, names, run, with_parents};
    use crate::ingest::SymbolKind;

    const SOURCE: &str = r#"import type { Request } from "express";
import { Injectable } from "@angular/core";

export namespace Api {
  export interface Handler<T> extends Base, Disposable {
    handle(req: Request): Promise<T>;
    readonly name: string;
  }
}

export type Id = string | number;

export enum Color { Red, Green }

@Injectable()
export class UserService extends BaseService<User> implements Handler<User>, OnInit {
  private readonly cache = new Map<string, User>();
  items: User[] = [];

  constructor(private readonly http: HttpClient) {
    super();
  }

  async handle(req: Request): Promise<User> {
    return this.http.get(req.url);
  }

  get count(): number {
    return this.items.length;
  }
}

export const handler: Handler<string> = async (event) => {
  return "ok";
};

declare function greet(name: string): void;
"#;

    #[test]
    fn test_typescript_declaration_counts() {
        let out = run(&profile(), "src/user.service.ts", SOURCE);
        assert_eq!(names(&out, SymbolKind::Import), vec!["express", "@angular/core"]);
        assert_eq!(names(&out, SymbolKind::Namespace), vec!["Api"]);
        assert_eq!(names(&out, SymbolKind::Interface), vec!["Handler"]);
        assert_eq!(names(&out, SymbolKind::Class), vec!["Color", "UserService"]);
        assert_eq!(
            with_parents(&out, SymbolKind::Method),
            vec![
                ("handle".to_string(), Some("Handler".to_string())),
                ("constructor".to_string(), Some("UserService".to_string())),
                ("handle".to_string(), Some("UserService".to_string())),
                ("count".to_string(), Some("UserService".to_string())),
            ]
        );
        assert_eq!(names(&out, SymbolKind::Property), vec!["name", "cache", "items"]);
        assert_eq!(names(&out, SymbolKind::Function), vec!["handler", "greet"]);
    }

    #[test]
    fn test_typescript_heritage_clauses() {
        let out = run(&profile(), "src/user.service.ts", SOURCE);
        assert_eq!(
            bases(&out),
            vec![
                ("Base".to_string(), "Inherits"),
                ("Disposable".to_string(), "Inherits"),
                ("BaseService".to_string(), "Inherits"),
                ("Handler".to_string(), "Implements"),
                ("OnInit".to_string(), "Implements"),
            ]
        );
        let handler = out.symbols.iter().find(|s| s.name == "Handler").unwrap();
        assert_eq!(handler.parent_symbol.as_deref(), Some("Api"));
    }
}
