//! Scaffolding for new patch plans.

/// Generate the template `.srcpatch.toml` for `--init`.
///
/// The template is a complete, working plan: it wires a `DeployModal` into
/// `components/Builder.tsx` (import, open-state, "Make Public" button, and
/// the modal mount). Every insertion is guarded, so re-running it is a no-op.
pub fn generate_init_template() -> String {
	r#"# srcpatch plan
#
# Rules run top to bottom; each sees the previous rule's output.
# Matchers: literal = "...", regex = '...', or substitute = "s/pat/rep/g".
# required = true aborts the run (nothing written) when the matcher is absent.
# unless_contains = "..." skips the rule when that text is already present.

target = "components/Builder.tsx"

[[rules]]
label = "import DeployModal"
literal = '''
import WebLLMModal from './WebLLMModal';
import { uploadMedia, formatFileSize } from '../utils/mediaUpload';'''
replacement = '''
import WebLLMModal from './WebLLMModal';
import DeployModal from './DeployModal';
import { uploadMedia, formatFileSize } from '../utils/mediaUpload';'''
required = true
unless_contains = "import DeployModal from './DeployModal';"

[[rules]]
label = "publish modal state"
literal = "const [showWebLLMModal, setShowWebLLMModal] = useState(false);"
replacement = '''
const [showWebLLMModal, setShowWebLLMModal] = useState(false);
  const [showPublishModal, setShowPublishModal] = useState(false);'''
required = true
unless_contains = "const [showPublishModal, setShowPublishModal]"

[[rules]]
label = "Make Public button"
literal = '''
              <button
                type="button"
                aria-label="Deploy project"'''
replacement = '''
              <button
                type="button"
                aria-label="Make site public"
                onClick={() => setShowPublishModal(true)}
                className="bg-gradient-to-r from-green-500 to-emerald-600 text-white px-4 py-2 rounded-lg shadow-sm hover:from-green-600 hover:to-emerald-700 transition-all text-xs font-semibold flex items-center gap-2 focus:outline-none focus:ring-2 focus:ring-blue-500"
              >
                <Globe size={16} />
                <span className="hidden sm:inline">Make Public</span>
              </button>

              <button
                type="button"
                aria-label="Deploy project"'''
required = true
unless_contains = 'aria-label="Make site public"'

[[rules]]
label = "mount DeployModal"
literal = "{/* 5. ANALYTICS MODAL */}"
replacement = '''
{/* PUBLISH MODAL */}
      <DeployModal
        isOpen={showPublishModal}
        onClose={() => setShowPublishModal(false)}
        bento={activeBento}
      />

      {/* 5. ANALYTICS MODAL */}'''
required = true
unless_contains = "{/* PUBLISH MODAL */}"
"#
	.to_string()
}
