//! Integration tests for the reference detectors
//!
//! Each detector runs over real files discovered by the scanner.

mod common;

use common::Project;
use searchdeadres::config::MarkupConfig;
use searchdeadres::detect::{
    binding_layout_name, BindingDetector, DetectorKind, FormattedCallDetector, MarkupDetector,
    Reference, ReferenceDetector, ReferenceScanner, SymbolDetector,
};
use searchdeadres::discovery::FileFinder;
use searchdeadres::resource::ResourceType;
use searchdeadres::tokenizer::mask;
use std::collections::HashSet;

fn scanner() -> ReferenceScanner {
    ReferenceScanner::new(vec![], MarkupConfig::default())
}

fn has(refs: &HashSet<Reference>, name: &str, resource_type: ResourceType, kind: DetectorKind) -> bool {
    refs.iter()
        .any(|r| r.name == name && r.resource_type == resource_type && r.kind == kind)
}

// ============================================================================
// Tokenizer
// ============================================================================

mod masking_tests {
    use super::*;

    #[test]
    fn test_mask_preserves_shape() {
        let source = "val a = \"R.string.x\" // R.string.y\n/* R.string.z\n */ val b = '\\n'\r\n";
        let masked = mask(source);

        assert_eq!(masked.len(), source.len());
        let newlines = |s: &str| s.match_indices('\n').map(|(i, _)| i).collect::<Vec<_>>();
        assert_eq!(newlines(&masked), newlines(source));
        assert!(!masked.contains("R.string"));
        assert!(masked.contains("val b"));
    }

    #[test]
    fn test_template_expressions_survive() {
        let source = r#"val s = "${getString(R.string.inner)} and $plain""#;
        let masked = mask(source);
        assert!(masked.contains("getString(R.string.inner)"));
        assert!(!masked.contains("and"));
    }

    #[test]
    fn test_raw_string_masked() {
        let source = "val s = \"\"\"\n  R.string.raw\n\"\"\"\nval t = R.string.after";
        let masked = mask(source);
        assert!(!masked.contains("R.string.raw"));
        assert!(masked.contains("R.string.after"));
    }
}

// ============================================================================
// Symbol detection
// ============================================================================

mod symbol_tests {
    use super::*;

    #[test]
    fn test_java_and_kotlin_sources() {
        let project = Project::new();
        project.src_file(
            "com/example/Main.java",
            "class Main { void f() { setContentView(R.layout.main); int c = R.color.brand; } }",
        );
        project.src_file("com/example/Other.kt", "val d = resources.getDimension(R.dimen.gap)");

        let refs = scanner().detect(&[project.src()], &[]);
        assert!(has(&refs, "main", ResourceType::Layout, DetectorKind::Symbol));
        assert!(has(&refs, "brand", ResourceType::Color, DetectorKind::Symbol));
        assert!(has(&refs, "gap", ResourceType::Dimen, DetectorKind::Symbol));
    }

    #[test]
    fn test_alias_is_per_file() {
        let project = Project::new();
        project.src_file("A.kt", "import com.lib.R as LibR\nval a = LibR.string.from_lib");
        project.src_file("B.kt", "val b = LibR.string.no_import");

        let refs = scanner().detect(&[project.src()], &[]);
        assert!(has(&refs, "from_lib", ResourceType::String, DetectorKind::Alias));
        assert!(!refs.iter().any(|r| r.name == "no_import"));
    }

    #[test]
    fn test_reference_positions() {
        let project = Project::new();
        let path = project.src_file("Main.kt", "fun f() {\n    val s = R.string.title\n}");

        let refs = scanner().detect(&[project.src()], &[]);
        let title = refs.iter().find(|r| r.name == "title").unwrap();
        assert_eq!(title.location.path, path);
        assert_eq!(title.location.line, 2);
        assert_eq!(title.location.column, 13);
    }

    #[test]
    fn test_symbol_detector_alone_ignores_markup() {
        let project = Project::new();
        project.res_file("layout/main.xml", "<View android:background=\"@color/bg\" />");

        let files = FileFinder::new(vec![]).source_set(&[], &[project.res()]);
        assert!(SymbolDetector::new().detect(&files).is_empty());
        assert_eq!(MarkupDetector::default().detect(&files).len(), 1);
    }
}

// ============================================================================
// Generated classes
// ============================================================================

mod generated_tests {
    use super::*;

    #[test]
    fn test_binding_names() {
        assert_eq!(binding_layout_name("ActivityMain").as_deref(), Some("activity_main"));
        assert_eq!(binding_layout_name("ItemList").as_deref(), Some("item_list"));
    }

    #[test]
    fn test_binding_output_is_not_a_use() {
        let project = Project::new();
        project.file(
            "app/build/generated/data_binding_base_class_source_out/debug/out/com/example/databinding/FragmentHomeBinding.java",
            "public final class FragmentHomeBinding { int id = R.id.root; int s = R.string.generated; }",
        );
        project.src_file("Home.kt", "val b: ItemRowBinding? = null");

        let refs = BindingDetector::new().detect(
            &FileFinder::new(vec![]).source_set(&[project.root().to_path_buf()], &[]),
        );
        let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["item_row"]);

        let all = scanner().detect(&[project.root().to_path_buf()], &[]);
        assert!(!all.iter().any(|r| r.name == "generated"));
    }

    #[test]
    fn test_formatted_output_is_not_a_use() {
        let project = Project::new();
        project.file(
            "app/build/generated/formatted_resources/main/FormattedResources.kt",
            "object FormattedResources { fun all() = FormattedResources.everything(R.string.everything) }",
        );
        project.src_file("Greeter.kt", "FormattedResources.welcome(name)");

        let files = FileFinder::new(vec![]).source_set(&[project.root().to_path_buf()], &[]);
        let refs = FormattedCallDetector::new().detect(&files);
        assert_eq!(refs.len(), 1);
        assert!(has(&refs, "welcome", ResourceType::String, DetectorKind::FormattedCall));

        let all = scanner().detect_in(&files);
        assert!(!all.iter().any(|r| r.name == "everything"));
    }
}

// ============================================================================
// Markup
// ============================================================================

mod markup_tests {
    use super::*;

    #[test]
    fn test_styles_file() {
        let project = Project::new();
        project.res_file(
            "values/themes.xml",
            r#"<resources>
    <style name="Theme.Shop" parent="Theme.Material3.DayNight">
        <item name="shopAccent">?attr/colorSecondary</item>
        <item name="android:windowBackground">@drawable/window_bg</item>
    </style>
    <style name="Theme.Shop.Checkout" />
    <style name="Button" parent="ShopButtonBase" />
</resources>
"#,
        );

        let refs = scanner().detect(&[], &[project.res()]);
        assert!(has(&refs, "shopAccent", ResourceType::Attr, DetectorKind::StyleItem));
        assert!(has(&refs, "colorSecondary", ResourceType::Attr, DetectorKind::ThemeAttribute));
        assert!(has(&refs, "window_bg", ResourceType::Drawable, DetectorKind::Markup));
        assert!(has(&refs, "Theme.Shop", ResourceType::Style, DetectorKind::ImplicitParent));
        assert!(has(&refs, "Theme", ResourceType::Style, DetectorKind::ImplicitParent));
        assert!(has(&refs, "ShopButtonBase", ResourceType::Style, DetectorKind::Parent));
        assert!(!refs.iter().any(|r| r.name.starts_with("Theme.Material3")));
        assert!(!refs.iter().any(|r| r.name == "android:windowBackground"));
    }

    #[test]
    fn test_custom_builtin_prefixes() {
        let project = Project::new();
        project.res_file(
            "values/styles.xml",
            "<resources>\n    <style name=\"Screen\" parent=\"VendorBase\" />\n</resources>\n",
        );

        let default_refs = scanner().detect(&[], &[project.res()]);
        assert!(has(&default_refs, "VendorBase", ResourceType::Style, DetectorKind::Parent));

        let config = MarkupConfig {
            builtin_style_prefixes: vec!["Vendor".to_string()],
            ..MarkupConfig::default()
        };
        let refs = ReferenceScanner::new(vec![], config).detect(&[], &[project.res()]);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_menu_and_navigation_markup() {
        let project = Project::new();
        project.res_file(
            "menu/main.xml",
            "<menu>\n    <item android:icon=\"@drawable/ic_search\" android:title=\"@string/search\" />\n</menu>",
        );
        project.res_file(
            "xml/backup_rules.xml",
            "<full-backup-content>\n    <!-- @xml/not_this -->\n    <include domain=\"sharedpref\" path=\"prefs.xml\" />\n</full-backup-content>",
        );

        let refs = scanner().detect(&[], &[project.res()]);
        assert!(has(&refs, "ic_search", ResourceType::Drawable, DetectorKind::Markup));
        assert!(has(&refs, "search", ResourceType::String, DetectorKind::Markup));
        assert!(!refs.iter().any(|r| r.name == "not_this"));
    }

    #[test]
    fn test_excluded_paths_not_scanned() {
        let project = Project::new();
        project.res_file("layout/main.xml", "<View android:background=\"@color/kept\" />");
        project.res_file("layout-land/main.xml", "<View android:background=\"@color/skipped\" />");

        let refs = ReferenceScanner::new(vec!["**/layout-land/**".to_string()], MarkupConfig::default())
            .detect(&[], &[project.res()]);
        assert!(refs.iter().any(|r| r.name == "kept"));
        assert!(!refs.iter().any(|r| r.name == "skipped"));
    }
}
