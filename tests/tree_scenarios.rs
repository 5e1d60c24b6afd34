//! End-to-end scenarios exercised through the public API: fresh-file
//! initialization, point round-trips, value normalization, the first leaf
//! split, large bulk loads, and persistence across reopen.

use larchdb::btree::{InternalNode, LeafNode, LEAF_CAPACITY};
use larchdb::storage::{page_is_leaf, zeroed_page, Pager, Superblock, SUPERBLOCK_PAGE};
use larchdb::{normalize_value, BPlusTree, PAGE_SIZE};
use tempfile::tempdir;

mod fresh_file {
    use super::*;

    #[test]
    fn open_nonexistent_path_creates_two_pages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t1.idx");

        let mut tree = BPlusTree::open(&path).unwrap();

        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            2 * PAGE_SIZE as u64,
            "superblock page plus one empty root leaf"
        );
        assert_eq!(tree.get(0).unwrap(), None);
    }

    #[test]
    fn superblock_records_root_and_page_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t1.idx");
        let root = BPlusTree::open(&path).unwrap().root();

        let mut pager = Pager::open(&path).unwrap();
        let mut buf = zeroed_page();
        pager.read_page(SUPERBLOCK_PAGE, &mut buf).unwrap();
        let sb = Superblock::from_bytes(&buf).unwrap();

        assert_eq!(sb.root(), root);
        assert_eq!(sb.page_count(), 2);
        assert_eq!(sb.free_list_head(), 0);

        pager.read_page(root, &mut buf).unwrap();
        let leaf = LeafNode::from_page(&buf).unwrap();
        assert_eq!(leaf.entry_count(), 0);
        assert_eq!(leaf.parent(), 0);
        assert_eq!(leaf.next_leaf(), 0);
    }
}

mod point_operations {
    use super::*;

    #[test]
    fn single_insert_get_pads_value() {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(dir.path().join("t2.idx")).unwrap();

        tree.insert(42, b"hello").unwrap();

        assert_eq!(tree.get(42).unwrap(), Some(*b"hello\0\0\0"));
    }

    #[test]
    fn long_value_is_truncated_to_eight_bytes() {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(dir.path().join("t3.idx")).unwrap();

        tree.insert(1, b"abcdefghXYZ").unwrap();

        assert_eq!(tree.get(1).unwrap(), Some(*b"abcdefgh"));
    }

    #[test]
    fn overwrite_returns_latest_value() {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(dir.path().join("over.idx")).unwrap();

        tree.insert(9, b"v1").unwrap();
        tree.insert(9, b"v2").unwrap();

        assert_eq!(tree.get(9).unwrap(), Some(normalize_value(b"v2")));
    }
}

mod leaf_split {
    use super::*;

    #[test]
    fn one_key_past_capacity_triggers_exactly_one_split() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t4.idx");
        let mut tree = BPlusTree::open(&path).unwrap();
        let original_leaf = tree.root();
        let pages_before = tree.page_count();

        for key in 0..=(LEAF_CAPACITY as i32) {
            tree.insert(key, b"v").unwrap();
        }

        // One new leaf and one new root, nothing else.
        assert_eq!(tree.page_count(), pages_before + 2);

        let mut pager = Pager::open(&path).unwrap();
        let mut buf = zeroed_page();

        pager.read_page(tree.root(), &mut buf).unwrap();
        assert!(!page_is_leaf(&buf).unwrap());
        let root = InternalNode::from_page(&buf).unwrap();
        assert_eq!(root.entry_count(), 1);
        assert_eq!(root.leftmost_child(), original_leaf);

        let sep = root.entries().unwrap()[0];
        let right_leaf = sep.right_child();

        pager.read_page(right_leaf, &mut buf).unwrap();
        let right = LeafNode::from_page(&buf).unwrap();
        assert_eq!(
            right.entries().unwrap()[0].key(),
            sep.key(),
            "separator is the smallest key of the new right leaf"
        );
        assert_eq!(right.next_leaf(), 0);

        pager.read_page(original_leaf, &mut buf).unwrap();
        let left = LeafNode::from_page(&buf).unwrap();
        assert_eq!(left.next_leaf(), right_leaf);

        for key in 0..=(LEAF_CAPACITY as i32) {
            assert_eq!(
                tree.get(key).unwrap(),
                Some(*b"v\0\0\0\0\0\0\0"),
                "key {}",
                key
            );
        }
    }
}

mod bulk_loading {
    use super::*;

    #[test]
    fn ten_thousand_sorted_pairs_then_lookup() {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(dir.path().join("t5.idx")).unwrap();

        let pairs: Vec<(i32, String)> = (1..=10_000).map(|k| (k, format!("r{}", k))).collect();
        let loaded = tree.bulk_load(pairs).unwrap();
        assert_eq!(loaded, 10_000);

        for key in 1..=10_000 {
            let expected = normalize_value(format!("r{}", key).as_bytes());
            assert_eq!(tree.get(key).unwrap(), Some(expected), "key {}", key);
        }
        assert_eq!(tree.get(0).unwrap(), None);
        assert_eq!(tree.get(10_001).unwrap(), None);
    }

    #[test]
    fn leaf_chain_yields_all_keys_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t5b.idx");
        let mut tree = BPlusTree::open(&path).unwrap();

        tree.bulk_load((1..=10_000).map(|k| (k, "x"))).unwrap();

        let mut pager = Pager::open(&path).unwrap();
        let mut buf = zeroed_page();

        let mut pid = tree.root();
        loop {
            pager.read_page(pid, &mut buf).unwrap();
            if page_is_leaf(&buf).unwrap() {
                break;
            }
            pid = InternalNode::from_page(&buf).unwrap().leftmost_child();
        }

        let mut keys = Vec::new();
        while pid != 0 {
            pager.read_page(pid, &mut buf).unwrap();
            let leaf = LeafNode::from_page(&buf).unwrap();
            keys.extend(leaf.entries().unwrap().iter().map(|e| e.key()));
            pid = leaf.next_leaf();
        }

        let expected: Vec<i32> = (1..=10_000).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn unsorted_input_is_rejected() {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(dir.path().join("t6.idx")).unwrap();

        let result = tree.bulk_load(vec![(1, "a"), (3, "c"), (2, "b")]);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not sorted"));
    }
}

mod persistence {
    use super::*;

    #[test]
    fn inserted_keys_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t8.idx");

        {
            let mut tree = BPlusTree::open(&path).unwrap();
            for key in 0..(LEAF_CAPACITY as i32 * 2) {
                tree.insert(key, format!("p{}", key).as_bytes()).unwrap();
            }
        }

        let mut tree = BPlusTree::open(&path).unwrap();
        for key in 0..(LEAF_CAPACITY as i32 * 2) {
            let expected = normalize_value(format!("p{}", key).as_bytes());
            assert_eq!(tree.get(key).unwrap(), Some(expected), "key {}", key);
        }
    }

    #[test]
    fn bulk_loaded_tree_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t8b.idx");

        {
            let mut tree = BPlusTree::open(&path).unwrap();
            tree.bulk_load((1..=5_000).map(|k| (k, format!("b{}", k))))
                .unwrap();
        }

        let mut tree = BPlusTree::open(&path).unwrap();
        for key in (1..=5_000).step_by(577) {
            let expected = normalize_value(format!("b{}", key).as_bytes());
            assert_eq!(tree.get(key).unwrap(), Some(expected), "key {}", key);
        }
        assert_eq!(tree.stats().unwrap().height, 2);
    }

    #[test]
    fn mutations_after_reopen_keep_working() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t8c.idx");

        {
            let mut tree = BPlusTree::open(&path).unwrap();
            tree.insert(1, b"before").unwrap();
        }

        let mut tree = BPlusTree::open(&path).unwrap();
        tree.insert(2, b"after").unwrap();
        tree.insert(1, b"updated").unwrap();

        assert_eq!(tree.get(1).unwrap(), Some(normalize_value(b"updated")));
        assert_eq!(tree.get(2).unwrap(), Some(normalize_value(b"after")));
    }
}
